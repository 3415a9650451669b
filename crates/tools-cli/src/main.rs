//! mcp-tools: command-line access to the screenshot and employee tools
//!
//! Runs the same core operations the MCP servers expose, without the
//! protocol, for debugging browser setups and inspecting databases.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tools_core::{
    browser::{ChromeBackend, ChromeConfig, MockBackend, PageCapture},
    employees::{EmployeeFilter, EmployeeStore, store::IN_MEMORY},
    model::{CaptureOptions, ImageFormat, PageRequest, Viewport},
    util::{detect::find_browser, encode::render, validate::validate_url},
};

#[derive(Parser)]
#[command(name = "mcp-tools", version)]
#[command(about = "CLI for exercising the screenshot and employee tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which browser executable would be used
    DetectBrowser,
    /// Render a webpage and save the screenshot
    Screenshot {
        /// Page to render (http, https or file URL)
        #[arg(long)]
        url: String,
        /// Output file path
        #[arg(short, long)]
        out: PathBuf,
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 800)]
        height: u32,
        /// Image format (png, jpeg, webp)
        #[arg(long, default_value = "png")]
        format: ImageFormat,
        /// Image quality (0-100)
        #[arg(long, default_value_t = 80)]
        quality: u8,
        /// Extra render time after load, in milliseconds
        #[arg(long, default_value_t = 0)]
        wait_ms: u64,
        /// Browser executable; searched on PATH when omitted
        #[arg(long, env = "CHROME_PATH")]
        browser: Option<PathBuf>,
        /// Pass --no-sandbox to the browser
        #[arg(long)]
        no_sandbox: bool,
        /// Seconds before the browser is killed
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// Use the synthetic backend instead of a browser
        #[arg(long)]
        mock: bool,
    },
    /// Inspect an employee database
    Employees {
        /// SQLite database file; :memory: loads the sample directory
        #[arg(long, env = "EMPLOYEE_DB", default_value = IN_MEMORY, global = true)]
        database: String,
        #[command(subcommand)]
        command: EmployeeCommands,
    },
}

#[derive(Subcommand)]
enum EmployeeCommands {
    /// List employees, optionally for one department
    List {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one employee
    Get { id: i64 },
    /// Print every report
    Report,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mcp_tools=info".parse()?)
                .add_directive("tools_core=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("mcp-tools v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::DetectBrowser => detect_browser(),
        Commands::Screenshot {
            url,
            out,
            width,
            height,
            format,
            quality,
            wait_ms,
            browser,
            no_sandbox,
            timeout_secs,
            mock,
        } => {
            let backend: Arc<dyn PageCapture> = if mock {
                Arc::new(MockBackend::new())
            } else {
                Arc::new(ChromeBackend::new(ChromeConfig {
                    executable: browser,
                    timeout: Duration::from_secs(timeout_secs.max(1)),
                    no_sandbox,
                    extra_args: Vec::new(),
                }))
            };
            let request = PageRequest::new(validate_url(&url)?)
                .with_viewport(Viewport::new(width, height)?)
                .with_wait_ms(wait_ms)?;
            let opts = CaptureOptions::builder().format(format).quality(quality).build();
            screenshot(backend.as_ref(), &request, &opts, &out).await
        }
        Commands::Employees { database, command } => employees(&database, command),
    }
}

fn detect_browser() -> Result<()> {
    let search = find_browser();
    match &search.found {
        Some(path) => println!("Browser: {}", path.display()),
        None => println!("No browser found"),
    }
    println!("\nSearched:");
    for candidate in &search.searched {
        println!("  {candidate}");
    }

    search.into_result()?;
    Ok(())
}

async fn screenshot(
    backend: &dyn PageCapture,
    request: &PageRequest,
    opts: &CaptureOptions,
    out: &Path,
) -> Result<()> {
    println!("Capturing {} with {}...", request.url, backend.name());
    let page = backend.capture_page(request).await?;

    let encoded = render(&page, opts)?;
    fs::write(out, &encoded.bytes).with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), bytes = encoded.bytes.len(), "screenshot saved");

    println!(
        "✓ {}x{} {} ({} bytes) saved to {}",
        encoded.width,
        encoded.height,
        encoded.format,
        encoded.bytes.len(),
        out.display()
    );
    Ok(())
}

fn employees(database: &str, command: EmployeeCommands) -> Result<()> {
    let store = EmployeeStore::open(database)
        .with_context(|| format!("failed to open employee database '{database}'"))?;
    if database == IN_MEMORY {
        store.seed_sample_data()?;
    }
    info!(database, employees = store.count()?, "opened employee database");

    match command {
        EmployeeCommands::List { department, limit } => {
            let rows = store.list(&EmployeeFilter {
                department,
                limit,
                offset: None,
            })?;
            println!("Found {} employees:\n", rows.len());
            for e in rows {
                println!("  {:>4}  {:<20} {:<18} {:<22} {:>12.2}", e.id, e.name, e.department, e.position, e.salary);
            }
        }
        EmployeeCommands::Get { id } => print_json(&store.get(id)?)?,
        EmployeeCommands::Report => {
            println!("Departments:");
            print_json(&store.department_summary()?)?;
            println!("\nSalaries:");
            print_json(&store.salary_statistics()?)?;
            println!("\nTop earners:");
            print_json(&store.top_earners(None, None)?)?;
            println!("\nHires by year:");
            print_json(&store.hires_by_year()?)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
