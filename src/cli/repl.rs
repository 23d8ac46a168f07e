//! Interactive REPL for sponsorscout
//!
//! Main menu, discovery runs, saved-search browsing, chat refinement and
//! contact enrichment.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::agent::naming::generate_filename_hint;
use crate::agent::{Agent, AgentOutcome, Refiner, StopReason};
use crate::cli::commands::{
    parse_browse, parse_indices, parse_main_menu, parse_refine, parse_review, BrowseChoice,
    MenuChoice, RefineCommand, ReviewChoice,
};
use crate::core::{Company, Config, Result, ScoutError};
use crate::enrichment::{write_contacts_csv, ContactFinder};
use crate::llm::{LLMProvider, OpenRouterClient};
use crate::search::{ExaClient, SearchProvider};
use crate::session::{Session, SessionStore};

/// Print `prompt` and read one trimmed line; `None` on end of input
pub fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input)? {
        0 => Ok(None),
        _ => Ok(Some(input.trim().to_string())),
    }
}

fn rule(c: char) -> String {
    c.to_string().repeat(60)
}

/// Print a numbered company list with confidence markers
pub fn display_companies(companies: &[Company]) {
    println!("\n{}", rule('='));
    println!("📋 DISCOVERED COMPANIES");
    println!("{}", rule('='));

    for (i, company) in companies.iter().enumerate() {
        let marker = company.confidence.map(|c| c.marker()).unwrap_or("");
        println!("\n{}. {} {}", i + 1, marker, company.domain);
        println!("   {}", company.title);
        println!("   {}", company.url);
        if let Some(rationale) = &company.rationale {
            println!("   💡 {}", rationale);
        }
    }

    println!("\n{}", rule('='));
    println!("Total: {} companies", companies.len());
    println!("{}", rule('='));
}

/// Where a review of a company list ended up
enum ReviewOutcome {
    Done,
    Rerun,
}

/// Where a discovery flow ended up
enum Flow {
    Menu,
    Quit,
}

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    config: Config,
    agent: Agent,
    refiner: Refiner,
    llm: Arc<dyn LLMProvider>,
    search: Arc<dyn SearchProvider>,
    store: SessionStore,
}

impl Repl {
    /// Create a REPL talking to OpenRouter and Exa
    pub fn with_config(config: Config) -> Result<Self> {
        let llm: Arc<dyn LLMProvider> = Arc::new(OpenRouterClient::from_config(&config)?);
        let search: Arc<dyn SearchProvider> = Arc::new(ExaClient::from_config(&config)?);
        Ok(Self::new(config, llm, search))
    }

    /// Create a REPL over the given backends
    pub fn new(config: Config, llm: Arc<dyn LLMProvider>, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            agent: Agent::new(config.clone(), llm.clone(), search.clone()),
            refiner: Refiner::new(
                llm.clone(),
                config.models.evaluator.clone(),
                config.agent.evaluation_max_tokens,
            ),
            store: SessionStore::new(config.session.dir.clone()),
            config,
            llm,
            search,
        }
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        loop {
            println!("{}", rule('='));
            println!("MAIN MENU");
            println!("{}", rule('='));
            println!("\n  [n] New search");
            println!("  [b] Browse saved searches");
            println!("  [q] Quit");

            let Some(choice) = read_line("\nYour choice: ")? else {
                break;
            };

            let result = match parse_main_menu(&choice) {
                MenuChoice::Quit => break,
                MenuChoice::Browse => self.browse().await,
                MenuChoice::NewSearch => self.new_search().await,
                MenuChoice::Invalid => {
                    println!("Invalid choice.");
                    continue;
                }
            };

            match result {
                Ok(Flow::Quit) => break,
                Ok(Flow::Menu) => {}
                Err(e) => eprintln!("\n❌ Error: {}\n", e),
            }
        }

        println!("\nGoodbye! 👋");
        Ok(())
    }

    async fn new_search(&mut self) -> Result<Flow> {
        loop {
            println!("\n{}", rule('-'));
            let Some(prompt) = read_line("🎯 What companies are you looking for?\n> ")? else {
                return Ok(Flow::Quit);
            };

            if prompt.is_empty() {
                println!("Please enter a prompt.");
                return Ok(Flow::Menu);
            }
            if matches!(prompt.to_lowercase().as_str(), "quit" | "exit" | "q") {
                return Ok(Flow::Quit);
            }

            let outcome = self.run_agent(&prompt).await?;
            match outcome.stop {
                StopReason::MaxRounds => println!(
                    "\n⚠️  Agent stopped after {} rounds; keeping what was approved so far.",
                    outcome.rounds
                ),
                StopReason::Cancelled => {
                    println!("\n⚠️  Search interrupted; keeping what was approved so far.")
                }
                StopReason::Completed => {}
            }

            if outcome.companies.is_empty() {
                println!("\n❌ No companies found or none passed evaluation. Try a different prompt.");
                return Ok(Flow::Menu);
            }

            display_companies(&outcome.companies);

            println!("\n📝 Generating filename for search results...");
            let hint =
                generate_filename_hint(self.llm.as_ref(), &self.config.models.naming, &prompt).await;
            let path = self
                .store
                .save(&prompt, &outcome.companies, &hint, &[], None)?;
            println!("\n💾 Saved to: {}", path.display());

            let mut session = self.store.load(&path)?;
            match self.review(&mut session, &path).await? {
                ReviewOutcome::Done => return Ok(Flow::Menu),
                ReviewOutcome::Rerun => continue,
            }
        }
    }

    /// Run the agent, letting Ctrl+C stop it early
    async fn run_agent(&self, prompt: &str) -> Result<AgentOutcome> {
        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    println!("\n⏹  Interrupt received, wrapping up...");
                    cancel.cancel();
                }
            })
        };

        let result = self.agent.run(prompt, &cancel).await;
        watcher.abort();
        result
    }

    async fn browse(&mut self) -> Result<Flow> {
        let searches = self.store.list();
        if searches.is_empty() {
            println!("\n📂 No saved searches found.");
            return Ok(Flow::Menu);
        }

        println!("\n{}", rule('='));
        println!("📂 SAVED SEARCHES");
        println!("{}", rule('='));
        for (i, search) in searches.iter().enumerate() {
            let timestamp: String = search.timestamp.chars().take(16).collect();
            println!(
                "\n{}. [{}] {} companies",
                i + 1,
                timestamp,
                search.company_count
            );
            println!("   {}...", search.prompt);
        }
        println!("\n{}", rule('-'));
        println!("Enter a number to resume, or 'back' to return to menu.");

        let selected = loop {
            let Some(input) = read_line("\n> ")? else {
                return Ok(Flow::Menu);
            };
            match parse_browse(&input, searches.len()) {
                BrowseChoice::Back => return Ok(Flow::Menu),
                BrowseChoice::Select(index) => break &searches[index],
                BrowseChoice::Invalid(message) => println!("{}", message),
            }
        };

        let mut session = self.store.load(&selected.path)?;
        println!("\n📂 Loaded: {} companies", session.companies.len());
        println!(
            "   Original prompt: {}...",
            session.initial_prompt.chars().take(60).collect::<String>()
        );
        display_companies(&session.companies);

        match self.review(&mut session, &selected.path).await? {
            ReviewOutcome::Done => Ok(Flow::Menu),
            ReviewOutcome::Rerun => self.new_search().await,
        }
    }

    /// Post-search menu over a saved session
    async fn review(&mut self, session: &mut Session, path: &Path) -> Result<ReviewOutcome> {
        loop {
            println!("\nOptions:");
            println!("  [y] Approve and proceed to find emails");
            println!("  [c] Chat to refine the list");
            println!("  [e] Edit list (remove specific companies)");
            println!("  [r] Re-run with a new prompt");
            println!("  [n] Cancel and return to menu");

            let Some(input) = read_line("\nYour choice: ")? else {
                return Ok(ReviewOutcome::Done);
            };

            match parse_review(&input) {
                ReviewChoice::Approve => {
                    self.enrich(&session.companies).await?;
                    return Ok(ReviewOutcome::Done);
                }
                ReviewChoice::Chat => {
                    self.refine(session, path).await?;
                    display_companies(&session.companies);

                    let proceed = read_line("\nProceed to find emails? (y/n): ")?;
                    if proceed.as_deref().map(str::to_lowercase).as_deref() == Some("y") {
                        self.enrich(&session.companies).await?;
                    } else {
                        println!("Saved. Returning to menu.");
                    }
                    return Ok(ReviewOutcome::Done);
                }
                ReviewChoice::Edit => self.edit(session, path)?,
                ReviewChoice::Rerun => return Ok(ReviewOutcome::Rerun),
                ReviewChoice::Cancel => {
                    println!("Cancelled.");
                    return Ok(ReviewOutcome::Done);
                }
                ReviewChoice::Invalid => {
                    println!("Invalid choice. Please enter y, c, e, r, or n.")
                }
            }
        }
    }

    fn persist(&self, session: &Session, path: &Path) -> Result<()> {
        let saved = self.store.save(
            &session.initial_prompt,
            &session.companies,
            "",
            &session.conversation,
            Some(path),
        )?;
        println!("\n💾 Saved to: {}", saved.display());
        Ok(())
    }

    /// Remove companies by their listed numbers
    fn edit(&self, session: &mut Session, path: &Path) -> Result<()> {
        println!("\nEnter company numbers to REMOVE (comma-separated), or 'done' to finish:");
        while let Some(input) = read_line("> ")? {
            if input.eq_ignore_ascii_case("done") {
                break;
            }
            match parse_indices(&input) {
                Some(indices) => {
                    session.companies = std::mem::take(&mut session.companies)
                        .into_iter()
                        .enumerate()
                        .filter(|(i, _)| !indices.contains(i))
                        .map(|(_, company)| company)
                        .collect();
                    display_companies(&session.companies);
                }
                None => println!("Invalid input. Enter numbers separated by commas."),
            }
        }

        session.company_count = session.companies.len();
        self.persist(session, path)
    }

    async fn refine(&self, session: &mut Session, path: &Path) -> Result<()> {
        println!("\n{}", rule('='));
        println!("💬 REFINEMENT MODE");
        println!("{}", rule('='));
        println!("Describe changes you want to make to the list.");
        println!("Examples: 'remove companies I haven't heard of', 'only keep cloud providers',");
        println!("          'add more AI companies', 'remove #3 and #7'");
        println!("Type 'done' when finished, 'show' to see current list.");
        println!("{}", rule('-'));

        while let Some(input) = read_line("\n💭 You: ")? {
            let instruction = match parse_refine(&input) {
                RefineCommand::Empty => continue,
                RefineCommand::Done => {
                    println!("Exiting refinement mode.");
                    break;
                }
                RefineCommand::Show => {
                    display_companies(&session.companies);
                    continue;
                }
                RefineCommand::Instruction(instruction) => instruction,
            };

            match self.refiner.apply(session, &instruction).await {
                Ok(refinement) => {
                    println!("🤖 Assistant: {}", refinement.changes_made);
                    println!("   Current list: {} companies", session.companies.len());
                    self.persist(session, path)?;
                    if refinement.should_search_more {
                        println!("   (You can search for more companies by typing 'done' and starting a new search)");
                    }
                }
                Err(ScoutError::MalformedResponse(message)) => {
                    println!("❌ {}", message);
                    println!("Please try rephrasing your request.");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Find LinkedIn contacts and write them to the contacts CSV
    async fn enrich(&self, companies: &[Company]) -> Result<()> {
        println!("\n{}", rule('='));
        println!("📎 ENRICHMENT PHASE - Finding LinkedIn contacts...");
        println!("{}", rule('='));
        println!("Searching for DevRel, Recruiters, and C-Suite on LinkedIn...\n");

        let finder = ContactFinder::new(self.search.as_ref(), &self.config.enrichment);
        let contacts = finder.enrich_companies(companies).await;

        println!("\n{}", rule('='));
        println!("📊 RESULTS");
        println!("{}", rule('='));

        if contacts.is_empty() {
            println!("\n⚠️  No LinkedIn contacts found.");
            println!("   You may need to search manually for these companies.");
            return Ok(());
        }

        let output = &self.config.enrichment.output_path;
        write_contacts_csv(output, &contacts)?;
        println!(
            "\n🎉 Success! Found {} contacts across {} companies.",
            contacts.len(),
            companies.len()
        );
        println!("📁 Saved to {}", output.display());
        println!("\nPreview:");
        println!("{:<20} {:<24} {:<28} LinkedIn", "Company", "Name", "Title");
        for contact in contacts.iter().take(15) {
            println!(
                "{:<20} {:<24} {:<28} {}",
                contact.company, contact.name, contact.title, contact.linkedin
            );
        }

        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        println!("\n{}", rule('='));
        println!("💰 SPONSORSCOUT - Hackathon Sponsor Finder");
        println!("{}", rule('='));
        println!("\nThis tool helps you find potential sponsors for your hackathon.");
        println!("The AI agent will search for companies, evaluate them, and then");
        println!("you can refine the list through natural language chat.\n");
        println!("Models:");
        println!("  Agent:     {}", self.config.models.agent);
        println!("  Evaluator: {}", self.config.models.evaluator);
        println!("Searches:  {}", self.store.dir().display());
        println!();
    }
}
