use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use healthdesk_core::forms::{Form, FormCatalogue, FormKind};
use healthdesk_core::metrics::{average_steps, summarize};
use healthdesk_core::repositories::{DoctorDirectory, ProductCatalogue, WearableFeed};
use healthdesk_core::{
    CoreConfig, FormController, MockSubmitter, Point, RecordForwarder, SubmitOutcome,
    SymptomSelector, TracingNotifier,
};

#[derive(Parser)]
#[command(name = "healthdesk")]
#[command(about = "Health dashboard forms and body diagram tagging")]
struct Cli {
    /// YAML configuration file (defaults to `HEALTHDESK_CONFIG`, then the built-in data set)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List body diagram regions and their tags
    Regions,
    /// Print the region at a diagram coordinate
    Resolve {
        /// Horizontal position, 0-100
        x: f64,
        /// Vertical position, 0-100
        y: f64,
    },
    /// Tag one region and print the committed record
    Record {
        /// Region id (e.g. head, chest)
        region: String,
        /// Tag to select (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Validate one field of a form
    Check {
        /// register, login, profile, questionnaire or family
        form: String,
        field: String,
        value: String,
    },
    /// Fill in and submit the personal information form
    Profile {
        #[arg(long, default_value = "170")]
        height: String,
        #[arg(long, default_value = "65")]
        weight: String,
        #[arg(long)]
        province: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        district: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        birth_date: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        gender: Option<String>,
    },
    /// Show the cities of a province, or the districts of a city
    Options {
        province: String,
        city: Option<String>,
    },
    /// Summarise wearable readings
    Vitals,
    /// Search doctors by name, specialty or hospital
    Doctors {
        /// Search term (case-insensitive); lists everyone when omitted
        term: Option<String>,
    },
    /// Search shop products and optionally add some to the cart
    Shop {
        /// Search term matched against name, category and description
        term: Option<String>,
        /// Product id to add to the cart (repeatable)
        #[arg(long = "add")]
        add: Vec<u32>,
    },
}

/// Entry point for the healthdesk command-line host.
///
/// # Environment Variables
/// - `HEALTHDESK_CONFIG`: YAML configuration file used when `--config` is not given
/// - `RUST_LOG`: tracing filter (default directive: `healthdesk=info`)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("healthdesk=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .or_else(|| std::env::var_os("HEALTHDESK_CONFIG").map(PathBuf::from));
    let cfg = match config_path {
        Some(path) => CoreConfig::from_file(&path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => CoreConfig::builtin()?,
    };
    let cfg = Arc::new(cfg);
    tracing::debug!(
        regions = cfg.regions().len(),
        provinces = cfg.locations().provinces().len(),
        "configuration loaded"
    );
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Regions => {
            for region in cfg.regions().iter() {
                let area = region.area();
                let tags: Vec<&str> = region.tags().iter().map(|t| t.as_str()).collect();
                println!(
                    "{:<10} {:<6} x {:>5.1}..{:<5.1} y {:>5.1}..{:<5.1} {}",
                    region.id(),
                    region.name(),
                    area.left.get(),
                    area.right(),
                    area.top.get(),
                    area.bottom(),
                    tags.join(", ")
                );
            }
        }
        Commands::Resolve { x, y } => match cfg.regions().resolve(Point::new(x, y)) {
            Some(region) => println!("{} ({})", region.id(), region.name()),
            None => println!("No region at ({x}, {y})."),
        },
        Commands::Record {
            region,
            tags,
            notes,
        } => {
            let mut selector = SymptomSelector::new(Arc::clone(cfg.regions()));
            selector.activate_region(&region)?;
            for tag in &tags {
                selector.toggle_tag(tag)?;
            }
            if let Some(notes) = notes {
                selector.set_notes(notes)?;
            }
            let record = selector.commit()?.clone();

            let forwarder = RecordForwarder::new(
                MockSubmitter::new(cfg.submit_delay()),
                Arc::new(TracingNotifier),
            );
            if let SubmitOutcome::Failed(err) = forwarder.forward(&record).await {
                bail!("record was not saved: {err}");
            }
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Check { form, field, value } => {
            let kind: FormKind = form.parse()?;
            let catalogue = FormCatalogue::new(cfg.locations(), today)?;
            let mut form = Form::new(catalogue.schema(kind));
            let state = form.set_raw(&field, &value)?;
            match &state.error {
                Some(message) => println!("invalid: {message}"),
                None => println!("ok"),
            }
        }
        Commands::Profile {
            height,
            weight,
            province,
            city,
            district,
            birth_date,
            address,
            gender,
        } => {
            let catalogue = FormCatalogue::new(cfg.locations(), today)?;
            let mut controller = FormController::new(
                Form::new(catalogue.schema(FormKind::Profile)),
                MockSubmitter::new(cfg.submit_delay()),
                Arc::new(TracingNotifier),
            );

            let form = controller.form_mut();
            let mut inputs = vec![
                ("height", height),
                ("weight", weight),
                ("province", province),
                ("city", city),
                ("district", district),
                ("birth_date", birth_date),
                ("address", address),
            ];
            if let Some(gender) = gender {
                inputs.push(("gender", gender));
            }
            for (field, value) in &inputs {
                form.set_raw(field, value)?;
            }

            match controller.submit().await {
                SubmitOutcome::Submitted(payload) => {
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                SubmitOutcome::Invalid(errors) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{field}: {message}");
                    }
                    bail!("profile is invalid");
                }
                SubmitOutcome::Failed(err) => bail!("profile was not saved: {err}"),
                SubmitOutcome::Busy => bail!("a submission is already in progress"),
            }
        }
        Commands::Options { province, city } => {
            let catalogue = FormCatalogue::new(cfg.locations(), today)?;
            let mut form = Form::new(catalogue.schema(FormKind::Profile));
            if let Some(message) = form.set_raw("province", &province)?.error.clone() {
                bail!("{province}: {message}");
            }
            let (field, listed) = match city {
                Some(city) => {
                    form.set_raw("city", &city)?;
                    ("district", city)
                }
                None => ("city", province),
            };
            match form.options_for(field)? {
                Some(options) if options.disabled => println!("{listed} is not a listed option."),
                Some(options) if options.options.is_empty() => println!("{listed} has no {field} options."),
                Some(options) => println!("{}", options.options.join("\n")),
                None => println!("{field} has no options."),
            }
        }
        Commands::Vitals => {
            let mut feed = WearableFeed::mock();
            let snapshot = feed.refresh();
            for (label, series) in [
                ("heart rate", &snapshot.heart_rate),
                ("blood oxygen", &snapshot.blood_oxygen),
            ] {
                match summarize(series) {
                    Some(s) => println!(
                        "{label:<12} mean {:>6.1}  min {:>5.1}  max {:>5.1}",
                        s.mean, s.min, s.max
                    ),
                    None => println!("{label:<12} no readings"),
                }
            }
            for night in &snapshot.sleep {
                println!("sleep {}  {:.1} h", night.date, night.total_hours());
            }
            if let Some(avg) = average_steps(&snapshot.steps) {
                println!("steps        mean {avg:.0} per day");
            }
        }
        Commands::Doctors { term } => {
            let directory = DoctorDirectory::seeded();
            let found = directory.search(term.as_deref().unwrap_or_default());
            if found.is_empty() {
                println!("No doctors match.");
            }
            for doctor in found {
                println!(
                    "{:>2} {} {} {} rating {:.1} {} years{}",
                    doctor.id,
                    doctor.name,
                    doctor.specialty,
                    doctor.hospital,
                    doctor.rating,
                    doctor.experience_years,
                    if doctor.available { "" } else { " (fully booked)" }
                );
            }
        }
        Commands::Shop { term, add } => {
            let mut shop = ProductCatalogue::seeded();
            let found = shop.search(term.as_deref().unwrap_or_default());
            if found.is_empty() {
                println!("No products match.");
            }
            for product in found {
                let was = product
                    .original_price
                    .map(|p| format!(" (was ¥{p})"))
                    .unwrap_or_default();
                println!(
                    "{:>2} {} [{}] ¥{}{} rating {:.1} sold {} {}",
                    product.id,
                    product.name,
                    product.category,
                    product.price,
                    was,
                    product.rating,
                    product.sales,
                    product.tags.join(", ")
                );
            }
            for id in add {
                shop.add_to_cart(id)?;
            }
            println!("cart: {} item(s)", shop.cart_count());
        }
    }

    Ok(())
}
