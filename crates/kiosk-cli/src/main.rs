use clap::{Parser, Subcommand, ValueEnum};
use kiosk_core::locale::{message, Lang};
use kiosk_core::validate::sanitize_decoded;
use kiosk_flow::{Outcome, Registrar, RegistrationRequest};
use kiosk_sheets::WriteMode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "kiosk-cli")]
#[command(about = "Coupon issuance kiosk")]
struct Cli {
    /// Display language for outcome messages; defaults to KIOSK_LANG.
    #[arg(long, value_enum)]
    lang: Option<LangArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LangArg {
    En,
    Ta,
}

impl From<LangArg> for Lang {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Lang::En,
            LangArg::Ta => Lang::Ta,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a coupon code to a mobile number.
    Register {
        /// Coupon code, scanned or typed; non-digits are stripped.
        #[arg(long)]
        code: String,
        #[arg(long)]
        mobile: String,
        /// Customer name (optional).
        #[arg(long, default_value = "")]
        name: String,
        /// Treat the relay response as unreadable (cross-origin fallback).
        #[arg(long)]
        opaque_writes: bool,
    },
    /// Show a code's standing: master list, offer, current assignment.
    Check {
        #[arg(long)]
        code: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Config errors surface here, before any network call.
    let config = kiosk_core::load_app_config_from_env()?;
    let lang = cli.lang.map_or(config.lang, Lang::from);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    match cli.command {
        Commands::Register {
            code,
            mobile,
            name,
            opaque_writes,
        } => {
            let mode = if opaque_writes {
                WriteMode::Opaque
            } else {
                WriteMode::Verifiable
            };
            let registrar = Registrar::new(config, mode)?;
            let request = RegistrationRequest {
                code: sanitize_decoded(&code),
                mobile,
                name,
            };
            let outcome = registrar.register(&request).await;
            println!("{}", message(lang, outcome.message_key()));
            match outcome {
                Outcome::Succeeded { .. } => Ok(()),
                Outcome::Ambiguous | Outcome::Failed(_) => std::process::exit(1),
            }
        }
        Commands::Check { code } => {
            let registrar = Registrar::new(config, WriteMode::Verifiable)?;
            let report = registrar.inspect(&sanitize_decoded(&code)).await?;
            println!("in master list: {}", report.exists);
            match report.offer {
                Ok(offer_type) => println!("offer: {offer_type}"),
                Err(reason) => println!("offer: none ({reason})"),
            }
            match report.assignment {
                Some(a) => println!("assigned to: {}", a.registered_to),
                None => println!("assigned to: nobody"),
            }
            Ok(())
        }
    }
}
