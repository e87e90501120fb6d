//! CareInsight CLI: generate data, build context documents, browse the
//! dashboard and chat with the customer-success assistant.

use careinsight::dashboard::{
    churn_trend, ehr_integration, expansion_funnel, health_distribution, mrr_by_risk, segment_health,
    support_topics, Bar, InsightCard, Role, STARTER_QUESTIONS,
};
use careinsight::model::{thousands, DocType};
use careinsight::persistence::{write_documents, write_samples};
use careinsight::{
    ChatSession, CompletionModel, ContextBuilder, ContextScope, DashboardData, DataLayout, GeneratorConfig,
    LlmClient, LlmConfig, NarrativeGenerator, SyntheticGenerator,
};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::io::Write;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "careinsight", version, about = "Healthcare customer insight engine")]
struct Cli {
    /// Directory holding the CSV tables and context documents
    #[arg(long, default_value = ".", global = true, env = "CAREINSIGHT_DATA_DIR")]
    data_dir: PathBuf,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the synthetic tables, telemetry and narrative artifacts
    Generate {
        #[arg(long, default_value_t = 300)]
        customers: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = 2)]
        calls_per_customer: usize,

        /// Days of usage telemetry
        #[arg(long, default_value_t = 90)]
        telemetry_days: u32,

        /// Only write the four base tables
        #[arg(long)]
        skip_narratives: bool,
    },
    /// Build the JSONL context documents from the tables
    BuildContext,
    /// Show headline metrics and every chart
    Dashboard {
        /// Seed for the simulated churn trend
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Show critical and expansion quick insights
    Insights,
    /// Print one customer's profile document
    Profile {
        customer_id: String,

        /// Print the document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the interactive chat shell
    Shell,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::INFO } else { Level::WARN })
        .init();

    let layout = DataLayout::new(&cli.data_dir);

    let result = match cli.command {
        Commands::Generate {
            customers,
            seed,
            calls_per_customer,
            telemetry_days,
            skip_narratives,
        } => {
            let config = GeneratorConfig {
                customers,
                seed,
                calls_per_customer,
                telemetry_days,
                ..GeneratorConfig::default()
            };
            run_generate(&layout, config, skip_narratives)
        }
        Commands::BuildContext => run_build_context(&layout),
        Commands::Dashboard { seed } => with_data(&layout, |data| {
            print_dashboard(data, seed);
            Ok(())
        }),
        Commands::Insights => with_data(&layout, |data| {
            print_insights(data);
            Ok(())
        }),
        Commands::Profile { customer_id, json } => run_profile(&layout, &customer_id, json),
        Commands::Shell => run_shell(&layout).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_generate(layout: &DataLayout, config: GeneratorConfig, skip_narratives: bool) -> CliResult {
    let end_date = config.end_date;
    let seed = config.seed;
    let mut generator = SyntheticGenerator::new(config);
    let data = generator.generate();
    layout.write_dataset(&data)?;

    let mut table = summary_table();
    table.add_row(vec!["customers".to_string(), data.customers.len().to_string()]);
    table.add_row(vec!["interactions".to_string(), data.interactions.len().to_string()]);
    table.add_row(vec!["calls".to_string(), data.calls.len().to_string()]);
    table.add_row(vec!["feature requests".to_string(), data.feature_requests.len().to_string()]);

    if !skip_narratives {
        let telemetry = generator.generate_telemetry(&data.customers);
        layout.write_telemetry(&telemetry)?;

        let narratives = NarrativeGenerator::new(seed).with_end_date(end_date).generate_all(&data);
        layout.write_narratives(&narratives)?;

        table.add_row(vec!["telemetry rows".to_string(), telemetry.len().to_string()]);
        table.add_row(vec!["call transcripts".to_string(), narratives.transcripts.len().to_string()]);
        table.add_row(vec!["email threads".to_string(), narratives.emails.len().to_string()]);
        table.add_row(vec!["survey responses".to_string(), narratives.surveys.len().to_string()]);
        table.add_row(vec!["outcome records".to_string(), narratives.outcomes.len().to_string()]);
    }

    println!("{}", table);
    println!("Wrote files to {}", layout.dir().display());
    Ok(())
}

fn run_build_context(layout: &DataLayout) -> CliResult {
    let tables = layout.read_dataset()?;
    let docs = ContextBuilder::new(&tables).build_documents();
    write_documents(&layout.documents(), &docs)?;
    let samples = write_samples(layout, &docs)?;

    let profiles = docs.iter().filter(|d| d.doc_type == DocType::ComprehensiveProfile).count();
    let mut table = summary_table();
    table.add_row(vec!["customer profiles".to_string(), profiles.to_string()]);
    table.add_row(vec!["thematic insights".to_string(), (docs.len() - profiles).to_string()]);
    table.add_row(vec!["sample files".to_string(), samples.to_string()]);
    println!("{}", table);
    println!("Wrote {}", layout.documents().display());
    Ok(())
}

fn run_profile(layout: &DataLayout, customer_id: &str, json: bool) -> CliResult {
    let tables = layout.read_dataset()?;
    let doc = ContextBuilder::new(&tables).customer_profile(customer_id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("{}", doc.content);
    }
    Ok(())
}

/// Load the dashboard data, print load problems and run `f` when data is present
fn with_data(layout: &DataLayout, f: impl FnOnce(&DashboardData) -> CliResult) -> CliResult {
    let report = DashboardData::load(layout);
    for error in &report.errors {
        eprintln!("⚠️  {}", error);
    }
    match &report.data {
        Some(data) => f(data),
        None => Err(format!("no data loaded from {}", layout.dir().display()).into()),
    }
}

async fn run_shell(layout: &DataLayout) -> CliResult {
    let report = DashboardData::load(layout);
    for error in &report.errors {
        eprintln!("⚠️  Error loading data: {}", error);
    }
    let data = report.data;

    let mut session = ChatSession::new();
    let client = match LlmConfig::from_env().and_then(|config| LlmClient::new(&config)) {
        Ok(client) => {
            println!("✅ AI Connected: {}", client.describe());
            Some(client)
        }
        Err(e) => {
            println!("❌ AI Not Connected ({})", e);
            session.set_model_error(&e);
            None
        }
    };

    println!("🏥 Healthcare Customer Insight Engine");
    println!("Ask a question, or :help for commands. :quit to exit.\n");
    print_starters();

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        eprint!("careinsight[{}]> ", session.scope());
        std::io::stderr().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (command, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((c, rest)) => (c, rest.trim()),
            None => (trimmed, ""),
        };

        match command {
            ":quit" | ":exit" | ":q" => break,
            ":help" | ":h" => print_help(),
            ":scope" => set_scope(&mut session, data.as_ref(), arg),
            ":customers" => match &data {
                Some(d) => print_customers(d),
                None => eprintln!("⚠️  Data not loaded."),
            },
            ":history" => print_history(&session),
            ":clear" => {
                session.clear();
                println!("Chat cleared.");
            }
            ":dashboard" => match &data {
                Some(d) => print_dashboard(d, 42),
                None => eprintln!("⚠️  Data not loaded."),
            },
            ":insights" => match &data {
                Some(d) => print_insights(d),
                None => eprintln!("⚠️  Data not loaded."),
            },
            ":ask" if arg.is_empty() => eprintln!("Usage: :ask <question>"),
            ":ask" => ask(&mut session, data.as_ref(), client.as_ref(), arg).await,
            other if other.starts_with(':') => eprintln!("Unknown command {} (try :help)", other),
            _ => ask(&mut session, data.as_ref(), client.as_ref(), trimmed).await,
        }
    }

    println!("Bye!");
    Ok(())
}

async fn ask(session: &mut ChatSession, data: Option<&DashboardData>, client: Option<&LlmClient>, question: &str) {
    eprintln!("🤖 Analyzing...");
    let model = client.map(|c| c as &dyn CompletionModel);
    match session.submit(question, data, model).await {
        Ok(reply) => println!("\n{}\n", reply.content),
        Err(_) => {
            for alert in session.take_alerts() {
                eprintln!("⚠️  {}", alert);
            }
        }
    }
}

fn set_scope(session: &mut ChatSession, data: Option<&DashboardData>, arg: &str) {
    if arg.is_empty() || arg.eq_ignore_ascii_case("portfolio") {
        session.set_scope(ContextScope::Portfolio);
        println!("Scope: portfolio overview");
        return;
    }
    let Some(data) = data else {
        eprintln!("⚠️  Data not loaded.");
        return;
    };
    match data.tables.customer(arg) {
        Some(c) => {
            session.set_scope(ContextScope::Customer(c.customer_id.clone()));
            println!("Scope: {}", c.organization_name);
            println!("- MRR: ${}", thousands(c.mrr));
            println!("- Health: {}/100", c.health_score);
        }
        None => eprintln!("Unknown customer: {}", arg),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  :scope [portfolio|<customer_id>]  Set what questions are about");
    println!("  :customers                        List customers, lowest health first");
    println!("  :ask <question>                   Ask the assistant (bare text works too)");
    println!("  :history                          Show the chat transcript");
    println!("  :clear                            Clear the chat transcript");
    println!("  :dashboard                        Show metrics and charts");
    println!("  :insights                         Show quick insights");
    println!("  :quit                             Exit shell");
}

fn print_starters() {
    println!("Try:");
    for q in STARTER_QUESTIONS {
        println!("  - \"{}\"", q);
    }
    println!();
}

fn print_history(session: &ChatSession) {
    if session.transcript().is_empty() {
        println!("(no messages)");
        return;
    }
    for turn in session.transcript() {
        let speaker = match turn.role {
            Role::User => "🧑 You",
            Role::Assistant => "🤖 Assistant",
        };
        println!("{}:\n{}\n", speaker, turn.content);
    }
}

fn print_customers(data: &DashboardData) {
    let mut table = new_table(&["Customer", "Organization", "Segment", "Health", "MRR"]);
    for c in data.customers_by_health() {
        table.add_row(vec![
            c.customer_id.clone(),
            c.organization_name.clone(),
            c.segment.to_string(),
            c.health_score.to_string(),
            format!("${}", thousands(c.mrr)),
        ]);
    }
    println!("{}", table);
}

fn print_dashboard(data: &DashboardData, seed: u64) {
    let customers = &data.tables.customers;
    let m = data.metrics();

    let mut table = new_table(&["Total Customers", "Total MRR", "At Risk", "Avg Health"]);
    table.add_row(vec![
        m.customers.to_string(),
        m.total_mrr_k(),
        format!("{} ({:.1}%)", m.at_risk, m.at_risk_pct),
        format!("{:.0}", m.avg_health),
    ]);
    println!("📊 Portfolio Analytics Dashboard\n{}\n", table);

    print_bars("Customer Health Distribution", &health_distribution(customers), |v| *v as f64, |v| v.to_string());
    print_bars(
        "MRR Distribution by Risk Level",
        &mrr_by_risk(customers),
        |v| *v as f64,
        |v| format!("${}", thousands(*v)),
    );

    let mut table = new_table(&["Segment", "Avg Health", "Customers", "MRR"]);
    for row in segment_health(customers) {
        table.add_row(vec![
            row.segment.to_string(),
            format!("{:.1}", row.avg_health),
            row.customers.to_string(),
            format!("${}", thousands(row.mrr)),
        ]);
    }
    println!("Health Score & Customer Count by Segment\n{}\n", table);

    let end = data
        .tables
        .interactions
        .iter()
        .map(|i| i.date)
        .max()
        .unwrap_or(GeneratorConfig::default().end_date);
    let mut table = new_table(&["Week", "Critical", "High Risk", "Medium Risk"]);
    for week in churn_trend(seed, end) {
        table.add_row(vec![
            week.week.to_string(),
            week.critical.to_string(),
            week.high_risk.to_string(),
            week.medium.to_string(),
        ]);
    }
    println!("Churn Risk Trend (Last 12 Weeks, simulated)\n{}\n", table);

    let mut table = new_table(&["EHR System", "Integrated", "Avg Health", "Customers"]);
    for row in ehr_integration(customers) {
        table.add_row(vec![
            row.ehr_system,
            if row.integrated { "yes" } else { "no" }.to_string(),
            format!("{:.1}", row.avg_health),
            row.customers.to_string(),
        ]);
    }
    println!("Average Health Score by EHR System & Integration Status\n{}\n", table);

    let mut table = new_table(&["Stage", "Customers", "% of Total"]);
    for stage in expansion_funnel(customers) {
        table.add_row(vec![
            stage.label.to_string(),
            stage.customers.to_string(),
            format!("{:.0}%", stage.pct_of_total),
        ]);
    }
    println!("Expansion Opportunity Funnel\n{}\n", table);

    print_bars(
        "Top 10 Support Topics",
        &support_topics(&data.tables.interactions),
        |v| *v as f64,
        |v| v.to_string(),
    );
}

fn print_insights(data: &DashboardData) {
    let insights = data.insights();

    println!("🚨 Critical Attention Needed");
    if insights.critical.is_empty() {
        println!("  (none)");
    }
    for card in &insights.critical {
        println!("🔴 {} - ${}", card.organization_name, thousands(card.mrr));
        print_card(card);
    }

    println!("\n💰 Top Expansion Opportunities");
    if insights.expansion.is_empty() {
        println!("  (none)");
    }
    for card in &insights.expansion {
        let potential = card.expansion_potential.unwrap_or_default();
        println!("💡 {} - ${:.0} potential", card.organization_name, potential);
        print_card(card);
    }
}

fn print_card(card: &InsightCard) {
    println!("   Health: {}/100 | Segment: {} | MRR: ${}", card.health_score, card.segment, thousands(card.mrr));
    println!(
        "   EHR: {} ({}) | Tenure: {} months | Providers: {}",
        card.ehr_system,
        if card.ehr_integrated { "Integrated" } else { "Not Integrated" },
        card.tenure_months,
        card.num_providers
    );
    println!("   💬 :scope {} then ask \"{}\"", card.customer_id, card.question);
}

fn print_bars<T>(title: &str, bars: &[Bar<T>], magnitude: impl Fn(&T) -> f64, fmt_value: impl Fn(&T) -> String) {
    let max = bars.iter().map(|b| magnitude(&b.value)).fold(0.0_f64, f64::max);
    let mut table = new_table(&["", "Value", ""]);
    for bar in bars {
        let width = if max > 0.0 { (magnitude(&bar.value) / max * 30.0).round() as usize } else { 0 };
        table.add_row(vec![bar.label.clone(), fmt_value(&bar.value), "█".repeat(width)]);
    }
    println!("{}\n{}\n", title, table);
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn summary_table() -> Table {
    new_table(&["Output", "Rows"])
}
