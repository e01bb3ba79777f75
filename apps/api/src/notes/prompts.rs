// Prompt skeletons for each note kind.
// Downstream tooling parses generated notes against these skeletons, so the
// text (including indentation and trailing double spaces) must not change.

/// Book note prompt. Replace `{subject}` before sending.
pub const BOOK_NOTE_PROMPT_TEMPLATE: &str = r#"You are generating a structured book note for an Obsidian vault.
  
  Book title: "{subject}"
  
  Generate a book note using this EXACT markdown structure:
  
  *[One-line description of the book's main focus]*
  
  #reading #[domain-tag]
  
  From: [[]]
  
  Author: [Author Name]  
  Category: [Book Category]  
  Rating: ⭐⭐⭐⭐⭐
  
  ## Key Quotes
  
  > ""
  
  > ""
  
  > ""
  
  ## Scratchpad
  
  [Initial reactions, questions, disagreements]
  
  *[What's worth applying? What seems questionable? How does this connect to existing knowledge?]*
  
  ---
  
  ## Core Insights
  
  Main Argument:
  - [[]]
  
  Supporting Evidence:
  - [[]]
  
  Practical Applications:
  - [[]]
  
  ---
  
  ## Connections
  
  **Reinforces:**
  - [[]]
  
  **Challenges:**
  - [[]]
  
  **Builds on:**
  - [[]]
  
  ---
  
  Links to explore: [[Topic-Relevant Link 1]], [[Topic-Relevant Link 2]], [[Topic-Relevant Link 3]]
  
  IMPORTANT INSTRUCTIONS:
  - Fill in the description based on the book's main focus
  - Research and fill in the correct author name
  - Choose an appropriate category (e.g., Self-Help, Business, History, etc.)
  - Leave rating at 5 stars as a placeholder
  - Leave quote sections empty (user will fill these in as they read)
  - Provide thoughtful suggestions for "Links to explore" based on the book's topic
  - Use [[Double Brackets]] for all internal links
  - Keep the exact structure and formatting shown above"#;

/// Shown in place of the title when none can be extracted from the request.
pub const BOOK_TITLE_PLACEHOLDER: &str = "[Book Title]";
