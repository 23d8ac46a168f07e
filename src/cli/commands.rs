//! CLI commands
//!
//! Parsing for the single-key menus and free-text prompts of the
//! interactive flows.

/// Choice at the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    NewSearch,
    Browse,
    Quit,
    Invalid,
}

pub fn parse_main_menu(input: &str) -> MenuChoice {
    match input.trim().to_lowercase().as_str() {
        "n" | "new" => MenuChoice::NewSearch,
        "b" | "browse" => MenuChoice::Browse,
        "q" | "quit" | "exit" => MenuChoice::Quit,
        _ => MenuChoice::Invalid,
    }
}

/// Choice after a company list is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewChoice {
    /// Proceed to contact enrichment
    Approve,
    /// Enter chat refinement
    Chat,
    /// Remove companies by number
    Edit,
    /// Start over with a new prompt
    Rerun,
    /// Back to the main menu
    Cancel,
    Invalid,
}

pub fn parse_review(input: &str) -> ReviewChoice {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => ReviewChoice::Approve,
        "c" | "chat" => ReviewChoice::Chat,
        "e" | "edit" => ReviewChoice::Edit,
        "r" | "rerun" => ReviewChoice::Rerun,
        "n" | "no" => ReviewChoice::Cancel,
        _ => ReviewChoice::Invalid,
    }
}

/// Input inside the refinement loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineCommand {
    Done,
    Show,
    Instruction(String),
    Empty,
}

pub fn parse_refine(input: &str) -> RefineCommand {
    let input = input.trim();
    match input.to_lowercase().as_str() {
        "" => RefineCommand::Empty,
        "done" => RefineCommand::Done,
        "show" => RefineCommand::Show,
        _ => RefineCommand::Instruction(input.to_string()),
    }
}

/// Input at the saved-search browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseChoice {
    Back,
    /// Zero-based index into the listing
    Select(usize),
    /// Message to show before asking again
    Invalid(String),
}

pub fn parse_browse(input: &str, count: usize) -> BrowseChoice {
    let input = input.trim().to_lowercase();
    if input == "back" || input == "b" {
        return BrowseChoice::Back;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => BrowseChoice::Select(n - 1),
        Ok(_) => BrowseChoice::Invalid(format!("Please enter a number between 1 and {}.", count)),
        Err(_) => BrowseChoice::Invalid("Invalid input. Enter a number or 'back'.".to_string()),
    }
}

/// Parse comma-separated 1-based numbers into zero-based indices
///
/// Numbers past the end are kept; callers simply never match them.
pub fn parse_indices(input: &str) -> Option<Vec<usize>> {
    input
        .split(',')
        .map(|part| part.trim().parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1))
        .collect()
}

/// Action at a mail-merge preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    Approve,
    Skip,
    Regenerate,
    Quit,
}

pub fn parse_preview(input: &str) -> Option<PreviewAction> {
    match input.trim().to_lowercase().as_str() {
        "a" => Some(PreviewAction::Approve),
        "s" => Some(PreviewAction::Skip),
        "r" => Some(PreviewAction::Regenerate),
        "q" => Some(PreviewAction::Quit),
        _ => None,
    }
}
