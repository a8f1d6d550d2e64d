use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{ControllerEvent, FormController, PredictionClient};
use shared::domain::FORM_FIELDS;

#[derive(Parser, Debug)]
#[command(about = "Request a house-price estimate from the prediction backend")]
struct Args {
    /// Base URL of the prediction backend.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
    /// Feature overrides as NAME=VALUE pairs, e.g. LotArea=9600.
    #[arg(value_name = "NAME=VALUE")]
    fields: Vec<String>,
    /// Print the form field catalog with defaults and exit.
    #[arg(long)]
    list_fields: bool,
    /// Print only the settled price, skipping the animated counter.
    #[arg(long)]
    no_count_up: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    if args.list_fields {
        for field in FORM_FIELDS {
            println!("{:<14} {} (default {})", field.name, field.label, field.default);
        }
        return Ok(());
    }

    tracing::info!(server_url = %args.server_url, "requesting estimate");
    let controller = FormController::new(PredictionClient::new(args.server_url.clone()));
    controller.check_health();

    for pair in &args.fields {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("field override '{pair}' is not NAME=VALUE"))?;
        controller.set_field(name, value).await;
    }

    let mut events = controller.subscribe_events();
    controller.submit().await;

    let settled = loop {
        match events.recv().await? {
            ControllerEvent::PredictionReady { rendered, .. } => break rendered,
            ControllerEvent::PredictionFailed { message } => bail!(message),
            _ => {}
        }
    };

    if args.no_count_up {
        println!("Estimated price: ${settled}");
        return Ok(());
    }

    let mut stdout = io::stdout();
    loop {
        if let ControllerEvent::PriceFrame { rendered } = events.recv().await? {
            print!("\rEstimated price: ${rendered}   ");
            stdout.flush()?;
            if rendered == settled {
                break;
            }
        }
    }
    println!();
    Ok(())
}
