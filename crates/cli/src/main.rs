use clap::{Parser, Subcommand};
use clinic_core::content::{ContentBlock, NormalizedContent};
use clinic_core::{Catalog, ListingPage, ProcedurePage, QueryParams, SiteConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic procedure catalog CLI")]
struct Cli {
    /// Catalog file (defaults to CLINIC_CATALOG_PATH, then data/catalog.yaml, then the built-in copy)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and report content problems
    Validate,
    /// List categories with their subcategories and procedure counts
    Categories,
    /// Show the catalog listing for a selection, as the website would
    Walk {
        /// Category label
        #[arg(long)]
        cat: Option<String>,
        /// Subcategory slug
        #[arg(long)]
        sub: Option<String>,
        /// Free-text filter
        #[arg(long)]
        q: Option<String>,
    },
    /// Print the normalised content of a procedure
    Content {
        /// Procedure slug
        slug: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'clinic --help' for commands");
        return Ok(());
    };

    let catalog = load_catalog(cli.catalog)?;

    match command {
        Commands::Validate => validate(&catalog),
        Commands::Categories => categories(&catalog),
        Commands::Walk { cat, sub, q } => walk(
            &catalog,
            &QueryParams {
                cat,
                sub,
                q,
                step: None,
            },
        ),
        Commands::Content { slug, json } => content(&catalog, &slug, json)?,
    }

    Ok(())
}

fn load_catalog(path: Option<PathBuf>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => Ok(Catalog::load(&path)?),
        None => {
            let config = SiteConfig::from_lookup(|key| std::env::var(key).ok())?;
            Ok(Catalog::load_or_builtin(config.catalog_path())?)
        }
    }
}

fn validate(catalog: &Catalog) {
    println!(
        "Catalog OK: {} categories, {} subcategories, {} procedures",
        catalog.declared_categories().len(),
        catalog.subcategory_table().entries().len(),
        catalog.procedures().len()
    );

    let reports = catalog.content_reports();
    if reports.is_empty() {
        println!("All procedure content decoded cleanly.");
        return;
    }
    for report in reports {
        println!("{}:", report.slug);
        for issue in &report.issues {
            println!("  - {}", issue);
        }
    }
}

fn categories(catalog: &Catalog) {
    for category in catalog.declared_categories() {
        let procedures = catalog.filter(&category.label, None);
        println!("{} ({} procedures)", category.label, procedures.len());
        for label in catalog.subcategories_of(&category.label) {
            let slug = catalog.subcategory_table().resolve_slug(label);
            let count = catalog.filter(&category.label, Some(label)).len();
            println!("  {} [{}] ({} procedures)", label, slug, count);
        }
    }
}

fn walk(catalog: &Catalog, params: &QueryParams) {
    let page = ListingPage::build(catalog, params);

    if let Some(redirect) = &page.redirect {
        println!("Redirect (replace): {}", redirect.href());
    }
    println!("Step {}: {}", page.step.number(), page.header.title);
    println!("{}", page.header.description);
    if let Some(trail) = &page.breadcrumb {
        let labels: Vec<&str> = trail.crumbs.iter().map(|c| c.label.as_str()).collect();
        println!("Breadcrumb: {}", labels.join(" / "));
    }
    if let Some(back) = &page.back_href {
        println!("Back: {}", back);
    }
    println!();

    for card in &page.categories {
        println!("- {}  -> {}", card.label, card.href);
    }
    for card in &page.subcategories {
        println!("- {} [{}]  -> {}", card.label, card.slug, card.href);
    }
    for card in &page.procedures {
        println!("- {}  -> {}", card.title, card.href);
    }
    if page.is_empty_state() {
        println!("No procedures found.");
    }
}

fn content(catalog: &Catalog, slug: &str, json: bool) -> anyhow::Result<()> {
    let Some(page) = ProcedurePage::build(catalog, slug, &QueryParams::default()) else {
        anyhow::bail!("Procedure not found: {}", slug);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&page.content)?);
    } else {
        println!("# {}", page.title);
        print_content(&page.content);
    }
    Ok(())
}

fn print_content(content: &NormalizedContent) {
    if content.is_empty() {
        println!("(no content)");
        return;
    }

    for group in &content.groups {
        if let Some(title) = &group.title {
            println!("\n## {}", title);
        }
        if let Some(subtitle) = &group.subtitle {
            println!("{}", subtitle);
        }
        for section in &group.sections {
            if let Some(title) = group.display_title(section) {
                println!("\n### {}", title);
            }
            for block in &section.blocks {
                print_block(block);
            }
        }
    }
}

fn print_block(block: &ContentBlock) {
    match block {
        ContentBlock::Paragraph { text } => println!("{}", text),
        ContentBlock::Quote { text } => println!("> {}", text),
        ContentBlock::UnorderedList { items } => {
            for item in items {
                println!("- {}", item);
            }
        }
        ContentBlock::OrderedList { items } => {
            for (index, item) in items.iter().enumerate() {
                println!("{}. {}", index + 1, item);
            }
        }
        ContentBlock::Spacer { .. } => println!(),
    }
}
