//! Module defining the command line argument parser.

use std::convert::TryFrom;
use std::fs;
use std::path::PathBuf;

use clap::{self, Arg, ArgAction, ArgGroup, ArgMatches};
use clap::error::ErrorKind;
use grift::{CaptionContent, CaptionStyle, Color, ExportFormat, StylePatch};
use serde_json;

use super::super::{NAME, VERSION};
use super::model::{ArgsError, CaptionOptions, Command, Options, Source};


impl<'a> TryFrom<&'a ArgMatches> for Options {
    type Error = ArgsError;

    fn try_from(matches: &'a ArgMatches) -> Result<Self, Self::Error> {
        let verbose_count = matches.get_count(OPT_VERBOSE) as isize;
        let quiet_count = matches.get_count(OPT_QUIET) as isize;
        let verbosity = verbose_count - quiet_count;

        let command = match matches.subcommand() {
            Some((CMD_TEMPLATES, _)) => Command::Templates,
            Some((CMD_CAPTION, m)) => Command::Caption(CaptionOptions::try_from(m)?),
            _ => return Err(clap::Error::new(ErrorKind::MissingSubcommand).into()),
        };
        Ok(Options{verbosity, command})
    }
}

impl<'a> TryFrom<&'a ArgMatches> for CaptionOptions {
    type Error = ArgsError;

    fn try_from(matches: &'a ArgMatches) -> Result<Self, Self::Error> {
        let source = match matches.get_one::<String>(OPT_TEMPLATE) {
            Some(name) => Source::Template(name.trim().to_owned()),
            None => Source::File(matches.get_one::<PathBuf>(ARG_IMAGE).cloned()
                .ok_or_else(|| clap::Error::new(ErrorKind::MissingRequiredArgument))?),
        };

        let text = |id: &str| matches.get_one::<String>(id)
            .map(|t| t.replace("\\n", "\n"))
            .unwrap_or_default();
        let content = CaptionContent::new(text(OPT_TOP), text(OPT_BOTTOM));

        let style = {
            let base = match matches.get_one::<PathBuf>(OPT_STYLE) {
                Some(path) => {
                    let json = fs::read_to_string(path)
                        .map_err(|e| ArgsError::StyleFile(path.clone(), e))?;
                    serde_json::from_str::<CaptionStyle>(&json)?
                }
                None => CaptionStyle::default(),
            };
            base.apply(&style_patch(matches))?
        };

        // Output directory can be set explicitly to stdout via `-`.
        let output_dir = matches.get_one::<String>(OPT_OUTPUT_DIR)
            .map(|p| p.trim())
            .and_then(|p| if p == "-" { None } else { Some(PathBuf::from(p)) });

        Ok(CaptionOptions{
            source,
            content,
            style,
            format: matches.get_one::<ExportFormat>(OPT_FORMAT).cloned().unwrap_or_default(),
            output_dir,
            copy: matches.get_flag(OPT_COPY),
            share: matches.get_flag(OPT_SHARE),
            template_dir: matches.get_one::<PathBuf>(OPT_TEMPLATE_DIR).cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR)),
            font_dir: matches.get_one::<PathBuf>(OPT_FONT_DIR).cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_DIR)),
        })
    }
}

/// Collect the individual style flags into a patch.
fn style_patch(matches: &ArgMatches) -> StylePatch {
    let mut patch = StylePatch::new();
    if let Some(family) = matches.get_one::<String>(OPT_FONT) {
        patch = patch.font_family(family.trim());
    }
    if let Some(&size) = matches.get_one::<f32>(OPT_FONT_SIZE) {
        patch = patch.font_size(size);
    }
    if let Some(&width) = matches.get_one::<f32>(OPT_OUTLINE_WIDTH) {
        patch = patch.outline_width(width);
    }
    if let Some(&color) = matches.get_one::<Color>(OPT_COLOR) {
        patch = patch.text_color(color);
    }
    if let Some(&color) = matches.get_one::<Color>(OPT_OUTLINE_COLOR) {
        patch = patch.outline_color(color);
    }
    if let Some(&offset) = matches.get_one::<f32>(OPT_TOP_OFFSET) {
        patch = patch.top_offset(offset);
    }
    if let Some(&offset) = matches.get_one::<f32>(OPT_BOTTOM_OFFSET) {
        patch = patch.bottom_offset(offset);
    }
    if matches.get_flag(OPT_NO_WATERMARK) {
        patch = patch.watermark(false);
    }
    if let Some(&quality) = matches.get_one::<f32>(OPT_QUALITY) {
        patch = patch.export_quality(quality);
    }
    patch
}


// Parser definition

/// Type of the argument parser object.
pub type Parser = clap::Command;


lazy_static! {
    static ref ABOUT: &'static str = option_env!("CARGO_PKG_DESCRIPTION").unwrap_or("");
}

const CMD_TEMPLATES: &str = "templates";
const CMD_CAPTION: &str = "caption";

const ARG_IMAGE: &str = "image";
const OPT_TEMPLATE: &str = "template";
const OPT_TOP: &str = "top";
const OPT_BOTTOM: &str = "bottom";
const OPT_STYLE: &str = "style";
const OPT_FONT: &str = "font";
const OPT_FONT_SIZE: &str = "font-size";
const OPT_OUTLINE_WIDTH: &str = "outline-width";
const OPT_COLOR: &str = "color";
const OPT_OUTLINE_COLOR: &str = "outline-color";
const OPT_TOP_OFFSET: &str = "top-offset";
const OPT_BOTTOM_OFFSET: &str = "bottom-offset";
const OPT_NO_WATERMARK: &str = "no-watermark";
const OPT_QUALITY: &str = "quality";
const OPT_FORMAT: &str = "format";
const OPT_OUTPUT_DIR: &str = "output-dir";
const OPT_COPY: &str = "copy";
const OPT_SHARE: &str = "share";
const OPT_TEMPLATE_DIR: &str = "template-dir";
const OPT_FONT_DIR: &str = "font-dir";
const OPT_VERBOSE: &str = "verbose";
const OPT_QUIET: &str = "quiet";

const DEFAULT_TEMPLATE_DIR: &str = "data/templates";
const DEFAULT_FONT_DIR: &str = "data/fonts";


/// Create the parser for application's command line.
pub fn create_parser() -> Parser {
    let mut parser = Parser::new(*NAME);
    if let Some(ref version) = *VERSION {
        parser = parser.version(version.as_str());
    }
    parser
        .about(*ABOUT)
        .author(crate_authors!(", "))
        .subcommand_required(true)
        .arg_required_else_help(true)

        // Verbosity flags.
        .arg(Arg::new(OPT_VERBOSE)
            .long("verbose").short('v')
            .action(ArgAction::Count)
            .global(true)
            .conflicts_with(OPT_QUIET)
            .help("Increase logging verbosity"))
        .arg(Arg::new(OPT_QUIET)
            .long("quiet").short('q')
            .action(ArgAction::Count)
            .global(true)
            .conflicts_with(OPT_VERBOSE)
            .help("Decrease logging verbosity"))

        .subcommand(Parser::new(CMD_TEMPLATES)
            .about("List the preset templates"))
        .subcommand(create_caption_parser())
}

fn create_caption_parser() -> Parser {
    let percent = || clap::value_parser!(f32);

    Parser::new(CMD_CAPTION)
        .about("Caption an image and export the meme")

        // Image source.
        .arg(Arg::new(ARG_IMAGE)
            .value_name("IMAGE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Image file to caption"))
        .arg(Arg::new(OPT_TEMPLATE)
            .long("template").short('t')
            .value_name("NAME")
            .help("Preset template to caption instead of an image file"))
        .group(ArgGroup::new("source")
            .args([ARG_IMAGE, OPT_TEMPLATE])
            .required(true))

        // Captions.
        .arg(Arg::new(OPT_TOP)
            .long("top")
            .value_name("TEXT")
            .help("Text of the top caption (use \\n for line breaks)"))
        .arg(Arg::new(OPT_BOTTOM)
            .long("bottom")
            .value_name("TEXT")
            .help("Text of the bottom caption (use \\n for line breaks)"))

        // Style.
        .arg(Arg::new(OPT_STYLE)
            .long("style")
            .value_name("FILE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("JSON file with the caption style")
            .long_help(concat!(
                "JSON file with the caption style.\n\n",
                "Omitted fields keep their default values. ",
                "Any of the individual style flags override the values from the file.")))
        .arg(Arg::new(OPT_FONT)
            .long("font")
            .value_name("FAMILY")
            .help("Font family of the captions"))
        .arg(Arg::new(OPT_FONT_SIZE)
            .long("font-size")
            .value_name("PERCENT")
            .value_parser(percent())
            .help("Font size, in percent of image height"))
        .arg(Arg::new(OPT_OUTLINE_WIDTH)
            .long("outline-width")
            .value_name("PERCENT")
            .value_parser(percent())
            .help("Width of the text outline, in percent of image height"))
        .arg(Arg::new(OPT_COLOR)
            .long("color")
            .value_name("COLOR")
            .value_parser(|s: &str| s.parse::<Color>())
            .help("Color of the text"))
        .arg(Arg::new(OPT_OUTLINE_COLOR)
            .long("outline-color")
            .value_name("COLOR")
            .value_parser(|s: &str| s.parse::<Color>())
            .help("Color of the text outline"))
        .arg(Arg::new(OPT_TOP_OFFSET)
            .long("top-offset")
            .value_name("PERCENT")
            .value_parser(percent())
            .help("Baseline of the top caption, in percent of image height from the top"))
        .arg(Arg::new(OPT_BOTTOM_OFFSET)
            .long("bottom-offset")
            .value_name("PERCENT")
            .value_parser(percent())
            .help("Baseline of the bottom caption, in percent of image height from the bottom"))
        .arg(Arg::new(OPT_NO_WATERMARK)
            .long("no-watermark")
            .action(ArgAction::SetTrue)
            .help("Don't stamp the watermark on the meme"))
        .arg(Arg::new(OPT_QUALITY)
            .long("quality")
            .value_name("QUALITY")
            .value_parser(clap::value_parser!(f32))
            .help("Quality of JPEG exports, between 0 and 1"))

        // Output.
        .arg(Arg::new(OPT_FORMAT)
            .long("format").short('f')
            .value_name("FORMAT")
            .value_parser(|s: &str| s.parse::<ExportFormat>())
            .help("Format of the exported image (png or jpeg)"))
        .arg(Arg::new(OPT_OUTPUT_DIR)
            .long("output-dir").short('o')
            .value_name("DIR")
            .help("Directory to download the meme into")
            .long_help(concat!(
                "What directory should the meme be downloaded into.\n\n",
                "The file gets a generated name. By default, or when this flag is set ",
                "to `-` (single dash), the image is written to standard output instead.")))
        .arg(Arg::new(OPT_COPY)
            .long("copy")
            .action(ArgAction::SetTrue)
            .help("Also copy the meme to the clipboard"))
        .arg(Arg::new(OPT_SHARE)
            .long("share")
            .action(ArgAction::SetTrue)
            .help("Print the link for sharing the meme"))

        // Resources.
        .arg(Arg::new(OPT_TEMPLATE_DIR)
            .long("template-dir")
            .value_name("DIR")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Directory with the preset template images"))
        .arg(Arg::new(OPT_FONT_DIR)
            .long("font-dir")
            .value_name("DIR")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Directory with the TrueType fonts"))
}
