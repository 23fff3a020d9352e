use clap::{Parser, Subcommand};
use lightbox_gallery::config;
use lightbox_gallery::memory::Site;
use lightbox_gallery::output;
use lightbox_gallery::routes::{GET_ALL_THUMBNAILS, GET_THUMBNAIL, RequestParams};
use lightbox_gallery::service::GalleryService;
use lightbox_gallery::store::{IntegrityCheck, SaveRequest};
use lightbox_gallery::types::{EntityId, ViewContext};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lightbox-gallery")]
#[command(about = "Per-entry image galleries with a lightbox overlay")]
#[command(long_about = "\
Per-entry image galleries with a lightbox overlay

Runs the gallery against a JSON site file holding attachments and entity
metadata. Markup goes to stdout; diagnostics go to stderr (set RUST_LOG=debug
for detail).

Site file:

  {
    \"attachments\": [
      { \"id\": 3, \"parent\": 5, \"mime_type\": \"image/jpeg\",
        \"url\": \"/uploads/dawn.jpg\", \"width\": 1600, \"height\": 1200,
        \"title\": \"Dawn\", \"alt\": \"\", \"caption\": \"First light\",
        \"sizes\": { \"gallery-thumb\": { \"url\": \"/uploads/dawn-150x150.jpg\",
                                       \"width\": 150, \"height\": 150 } } }
    ],
    \"meta\": { \"5\": { \"gallery_images\": [\"3\"] } }
  }

Run 'lightbox-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site file with attachments and entity metadata
    #[arg(long, default_value = "site.json", global = true)]
    site: PathBuf,

    /// Directory holding config.toml (stock defaults when absent)
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Render an entry's content with its gallery appended
    Render(RenderArgs),
    /// Print the public gallery markup for an entity
    Embed {
        /// Entity whose gallery to render
        #[arg(long)]
        entity: u64,
    },
    /// List an entity's stored gallery
    Show {
        #[arg(long)]
        entity: u64,
    },
    /// Editor sync: list item for one image
    FetchOne {
        /// Image ref as the editor sends it
        #[arg(long)]
        image: String,
        /// Print response headers before the markup
        #[arg(long)]
        headers: bool,
    },
    /// Editor sync: list items for attached images not yet in the editor
    FetchRemaining {
        #[arg(long)]
        entity: u64,
        /// Refs already shown in the editor (repeatable)
        #[arg(long = "included")]
        included: Vec<String>,
        #[arg(long)]
        headers: bool,
    },
    /// Save an entity's gallery from a submitted form
    Save(SaveArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    #[arg(long)]
    entity: u64,
    /// Render as a single-entry view
    #[arg(long)]
    singular: bool,
    /// Entry is password protected
    #[arg(long)]
    protected: bool,
    /// Also expand [gallery] directives in the content
    #[arg(long)]
    directives: bool,
    /// Content file (reads stdin when omitted)
    input: Option<PathBuf>,
}

#[derive(clap::Args)]
struct SaveArgs {
    #[arg(long)]
    entity: u64,
    /// Integrity token submitted with the form
    #[arg(long)]
    token: Option<String>,
    /// Token the form was issued with
    #[arg(long, env = "GALLERY_FORM_TOKEN")]
    expected_token: String,
    /// Image refs in display order (repeatable)
    #[arg(long = "image")]
    images: Vec<String>,
    /// Treat as an autosave request
    #[arg(long)]
    autosave: bool,
}

/// Accepts exactly the token the form was issued with.
struct SharedToken(String);

impl IntegrityCheck for SharedToken {
    fn verify(&self, _entity: EntityId, token: &str) -> bool {
        !self.0.is_empty() && self.0 == token
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::GenConfig => print!("{}", config::stock_config_toml()),
        command => run(command, &cli.site, &cli.config)?,
    }

    Ok(())
}

fn run(
    command: Command,
    site_path: &Path,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = config::load_settings(config_dir)?;
    let site = Arc::new(Site::load(site_path)?);
    let service = GalleryService::with_site(settings, Arc::clone(&site));

    match command {
        Command::GenConfig => print!("{}", config::stock_config_toml()),
        Command::Render(args) => {
            let content = read_input(args.input.as_deref())?;
            let entity = EntityId(args.entity);
            let context = ViewContext {
                is_password_protected: args.protected,
                is_singular_view: args.singular,
            };
            let injector = service.injector();
            let content = if args.directives {
                injector.expand_directives(&content, entity, service.settings())
            } else {
                content
            };
            print!(
                "{}",
                injector.apply(&content, entity, &context, service.settings())
            );
        }
        Command::Embed { entity } => {
            let html = service
                .injector()
                .embed(None, EntityId(entity), service.settings());
            println!("{}", html);
        }
        Command::Show { entity } => {
            let entity = EntityId(entity);
            let images = service.store().read(entity)?;
            output::print_gallery(entity, &images, &service.resolver());
        }
        Command::FetchOne { image, headers } => {
            let params = RequestParams::from_pairs([("imageid", image)]);
            let response = service
                .routes()
                .dispatch(GET_THUMBNAIL, &service.ajax(), &params)?;
            output::print_sync_response(&response, headers);
        }
        Command::FetchRemaining {
            entity,
            included,
            headers,
        } => {
            let mut params = RequestParams::from_pairs([("post_id", entity.to_string())]);
            for image in included {
                params.push("included", image);
            }
            let response = service
                .routes()
                .dispatch(GET_ALL_THUMBNAILS, &service.ajax(), &params)?;
            output::print_sync_response(&response, headers);
        }
        Command::Save(args) => {
            let entity = EntityId(args.entity);
            let request = SaveRequest {
                token: args.token,
                images: args.images,
                autosave: args.autosave,
            };
            let check = SharedToken(args.expected_token);
            let outcome = service.store().save(entity, &request, &check)?;
            site.save(site_path)?;
            output::print_save_outcome(entity, &outcome);
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
