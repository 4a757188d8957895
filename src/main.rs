use std::path::PathBuf;
use std::process::ExitCode;

use brief_pdf::session::{BriefCommand, BriefSession, BriefUpdate};
use brief_pdf::{BriefOptions, FormState, PageFormat, UploadFile};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(
    name = "brief-pdf",
    about = "Render a color grading brief (questionnaire answers + reference images) to PDF",
    version
)]
struct Cli {
    /// JSON object of form field name → value
    #[arg(short, long)]
    form: Option<PathBuf>,

    /// Reference image; repeat for several. Non-image files are ignored
    #[arg(short, long = "image")]
    images: Vec<PathBuf>,

    /// Caption for an image, as FILE_NAME=TEXT
    #[arg(short, long = "caption", value_parser = parse_caption)]
    captions: Vec<(String, String)>,

    /// Output PDF file
    #[arg(short, long, default_value = "brief.pdf")]
    output: PathBuf,

    /// Page size
    #[arg(long, default_value = "a4", value_enum)]
    paper: PaperArg,

    /// TrueType/OpenType font to embed (default: $BRIEF_PDF_FONT, then Helvetica)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Document title
    #[arg(long)]
    title: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    Letter,
}

impl From<PaperArg> for PageFormat {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => PageFormat::A4,
            PaperArg::Letter => PageFormat::Letter,
        }
    }
}

fn parse_caption(s: &str) -> Result<(String, String), String> {
    let (name, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FILE_NAME=TEXT, got '{s}'"))?;
    Ok((name.trim().to_string(), text.to_string()))
}

fn report(update: &BriefUpdate) -> bool {
    match update {
        BriefUpdate::ImagesChanged { cards } => {
            log::info!("{} image(s) attached", cards.len());
            true
        }
        BriefUpdate::ExportComplete { path, page_count } => {
            println!("Wrote {} ({page_count} pages)", path.display());
            true
        }
        BriefUpdate::Error { message } => {
            eprintln!("Error: {message}");
            false
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let form = match &cli.form {
        Some(path) => match std::fs::read_to_string(path)
            .map_err(brief_pdf::Error::from)
            .and_then(|json| FormState::from_json(&json))
        {
            Ok(form) => form,
            Err(e) => {
                eprintln!("Error: cannot read form {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => FormState::new(),
    };

    let mut options = BriefOptions {
        page: cli.paper.into(),
        font_path: cli.font.clone(),
        ..BriefOptions::default()
    };
    if let Some(title) = &cli.title {
        options.title = title.clone();
    }
    let mut session = BriefSession::new(options.with_env()).with_form(form);

    let files = cli.images.iter().map(UploadFile::from_path).collect();
    for update in session.handle(BriefCommand::AddFiles { files }).await {
        report(&update);
    }

    for (name, text) in &cli.captions {
        let Some(id) = session
            .store()
            .records()
            .iter()
            .find(|r| &r.display_name == name)
            .map(|r| r.id)
        else {
            log::warn!("No uploaded image named {name}; caption ignored");
            continue;
        };
        session
            .handle(BriefCommand::CaptionChanged {
                id,
                text: text.clone(),
            })
            .await;
    }

    let mut ok = true;
    for update in session
        .handle(BriefCommand::Export {
            output_path: cli.output.clone(),
        })
        .await
    {
        ok &= report(&update);
    }

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
