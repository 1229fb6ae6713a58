use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use taskdesk_core::{
    AlignmentOptions, CardSide, DocumentKind, ImageTranslationOptions, JobFile, JobKind,
    JobRequest, PageTemplate,
};

use crate::logging::LogDestination;
use crate::prefs::PersistedPrefs;

#[derive(Debug, Parser)]
#[command(
    name = "taskdesk",
    version,
    about = "Submit document jobs to a taskdesk backend and watch them finish"
)]
pub struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000/")]
    pub server: String,

    /// Directory result artifacts are saved into.
    #[arg(long, global = true, default_value = "output")]
    pub output_dir: PathBuf,

    /// Milliseconds between status polls.
    #[arg(long, global = true, default_value_t = 1200)]
    pub poll_interval_ms: u64,

    /// Where log lines are written.
    #[arg(long, global = true, value_enum, default_value_t = LogArg::File)]
    pub log: LogArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    File,
    Terminal,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::File => LogDestination::File,
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Align an original document with its translation into a review sheet.
    Align(AlignArgs),
    /// Verify numbers in a translated .docx against the original.
    NumberCheck(NumberCheckArgs),
    /// Translate a scanned ID card or marriage certificate image.
    TranslateImage(TranslateImageArgs),
}

#[derive(Debug, Args)]
pub struct AlignArgs {
    /// Original document.
    pub original: PathBuf,
    /// Translated document.
    pub translated: PathBuf,

    /// Source language name; defaults to the last used value.
    #[arg(long)]
    pub source_lang: Option<String>,
    /// Target language name; defaults to the last used value.
    #[arg(long)]
    pub target_lang: Option<String>,
    /// Model name; defaults to the last used value.
    #[arg(long)]
    pub model: Option<String>,
    /// Disable splitting long documents before alignment.
    #[arg(long)]
    pub no_post_split: bool,
    /// Overlap buffer in characters between split parts.
    #[arg(long)]
    pub buffer_chars: Option<u32>,
}

#[derive(Debug, Args)]
pub struct NumberCheckArgs {
    /// Original .docx.
    pub original: PathBuf,
    /// Translated .docx to check.
    pub translated: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocTypeArg {
    IdCard,
    MarriageCert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CardSideArg {
    Front,
    Back,
}

impl From<CardSideArg> for CardSide {
    fn from(arg: CardSideArg) -> Self {
        match arg {
            CardSideArg::Front => CardSide::Front,
            CardSideArg::Back => CardSide::Back,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageTemplateArg {
    Page1,
    Page2,
    Page3,
}

impl From<PageTemplateArg> for PageTemplate {
    fn from(arg: PageTemplateArg) -> Self {
        match arg {
            PageTemplateArg::Page1 => PageTemplate::Page1,
            PageTemplateArg::Page2 => PageTemplate::Page2,
            PageTemplateArg::Page3 => PageTemplate::Page3,
        }
    }
}

#[derive(Debug, Args)]
pub struct TranslateImageArgs {
    /// Image to translate.
    pub image: PathBuf,

    #[arg(long, default_value = "zh")]
    pub from_lang: String,
    #[arg(long, default_value = "en")]
    pub to_lang: String,
    /// Skip rendering the visualization overlay image.
    #[arg(long)]
    pub no_visualization: bool,

    #[arg(long, value_enum, default_value_t = DocTypeArg::IdCard)]
    pub doc_type: DocTypeArg,

    /// Which side of an ID card the image shows.
    #[arg(long, value_enum, default_value_t = CardSideArg::Front)]
    pub card_side: CardSideArg,

    /// Layout template for marriage certificate pages.
    #[arg(long, value_enum, default_value_t = PageTemplateArg::Page1)]
    pub page_template: PageTemplateArg,
    /// Merge adjacent text boxes on certificate pages.
    #[arg(long)]
    pub merge: bool,
    /// Nudge overlapping text boxes apart.
    #[arg(long)]
    pub overlap_fix: bool,
    /// Normalize full-width colons in recognized labels.
    #[arg(long)]
    pub colon_fix: bool,
    /// Fixed font size for rendered text; autodetected when absent.
    #[arg(long)]
    pub font_size: Option<u8>,
}

impl Command {
    /// Build the job from the parsed arguments, filling unset alignment
    /// options from the persisted preferences.
    pub fn to_request(&self, prefs: &PersistedPrefs) -> JobRequest {
        match self {
            Command::Align(args) => {
                let defaults = AlignmentOptions::default();
                let options = AlignmentOptions {
                    source_lang: args
                        .source_lang
                        .clone()
                        .or_else(|| prefs.source_lang.clone())
                        .unwrap_or(defaults.source_lang),
                    target_lang: args
                        .target_lang
                        .clone()
                        .or_else(|| prefs.target_lang.clone())
                        .unwrap_or(defaults.target_lang),
                    model_name: args
                        .model
                        .clone()
                        .or_else(|| prefs.model_name.clone())
                        .unwrap_or(defaults.model_name),
                    enable_post_split: !args.no_post_split,
                    buffer_chars: args.buffer_chars.unwrap_or(defaults.buffer_chars),
                    ..defaults
                };
                JobRequest::new(
                    JobKind::Alignment(options),
                    vec![
                        JobFile::new("original_file", args.original.clone()),
                        JobFile::new("translated_file", args.translated.clone()),
                    ],
                )
            }
            Command::NumberCheck(args) => JobRequest::new(
                JobKind::NumberCheck,
                vec![
                    JobFile::new("original_file", args.original.clone()),
                    JobFile::new("translated_file", args.translated.clone()),
                ],
            ),
            Command::TranslateImage(args) => {
                let document = match args.doc_type {
                    DocTypeArg::IdCard => DocumentKind::IdCard {
                        card_side: args.card_side.into(),
                    },
                    DocTypeArg::MarriageCert => DocumentKind::MarriageCert {
                        page_template: args.page_template.into(),
                        enable_merge: args.merge,
                        enable_overlap_fix: args.overlap_fix,
                        enable_colon_fix: args.colon_fix,
                        font_size: args.font_size,
                    },
                };
                let options = ImageTranslationOptions {
                    from_lang: args.from_lang.clone(),
                    to_lang: args.to_lang.clone(),
                    enable_visualization: !args.no_visualization,
                    document,
                };
                JobRequest::new(
                    JobKind::ImageTranslation(options),
                    vec![JobFile::new("file", args.image.clone())],
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn align_fills_options_from_prefs() {
        let cli = Cli::try_parse_from(["taskdesk", "align", "a.docx", "b.docx"]).unwrap();
        let prefs = PersistedPrefs {
            source_lang: Some("日语".to_string()),
            target_lang: Some("英语".to_string()),
            model_name: None,
        };
        let request = cli.command.to_request(&prefs);
        match request.kind {
            JobKind::Alignment(options) => {
                assert_eq!(options.source_lang, "日语");
                assert_eq!(options.target_lang, "英语");
                assert_eq!(options.model_name, "Google Gemini 2.5 Flash");
                assert!(options.enable_post_split);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(request.files.len(), 2);
        assert_eq!(request.files[0].field, "original_file");
    }

    #[test]
    fn explicit_flags_win_over_prefs() {
        let cli = Cli::try_parse_from([
            "taskdesk",
            "align",
            "a.docx",
            "b.docx",
            "--source-lang",
            "法语",
            "--no-post-split",
            "--buffer-chars",
            "500",
        ])
        .unwrap();
        let prefs = PersistedPrefs {
            source_lang: Some("日语".to_string()),
            ..PersistedPrefs::default()
        };
        let request = cli.command.to_request(&prefs);
        match request.kind {
            JobKind::Alignment(options) => {
                assert_eq!(options.source_lang, "法语");
                assert!(!options.enable_post_split);
                assert_eq!(options.buffer_chars, 500);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn translate_image_builds_a_tagged_document() {
        let cli = Cli::try_parse_from([
            "taskdesk",
            "translate-image",
            "cert.png",
            "--doc-type",
            "marriage-cert",
            "--page-template",
            "page2",
            "--merge",
            "--font-size",
            "14",
        ])
        .unwrap();
        let request = cli.command.to_request(&PersistedPrefs::default());
        match request.kind {
            JobKind::ImageTranslation(options) => match options.document {
                DocumentKind::MarriageCert {
                    page_template,
                    enable_merge,
                    font_size,
                    ..
                } => {
                    assert_eq!(page_template, PageTemplate::Page2);
                    assert!(enable_merge);
                    assert_eq!(font_size, Some(14));
                }
                other => panic!("unexpected document {other:?}"),
            },
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(request.files[0].field, "file");
    }

    #[test]
    fn global_flags_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "taskdesk",
            "number-check",
            "a.docx",
            "b.docx",
            "--server",
            "http://10.0.0.5:9000/",
            "--poll-interval-ms",
            "1500",
        ])
        .unwrap();
        assert_eq!(cli.server, "http://10.0.0.5:9000/");
        assert_eq!(cli.poll_interval_ms, 1500);
    }
}
