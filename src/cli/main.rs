//!
//! griftsh -- Memes in the shell
//!

#[cfg(feature = "clipboard")] extern crate arboard;
#[macro_use] extern crate clap;
             extern crate exitcode;
             extern crate grift;
#[cfg(feature = "clipboard")] extern crate image;
             extern crate isatty;
#[macro_use] extern crate lazy_static;
             extern crate serde_json;
#[macro_use] extern crate slog;
             extern crate slog_envlogger;
             extern crate slog_scope;
             extern crate slog_stdlog;
             extern crate slog_term;

#[cfg(test)] #[macro_use] extern crate spectral;
#[cfg(test)]              extern crate tempfile;

// `log` must be at the end of these declarations because we want to simultaneously:
// * use the standard `log` macros (which would be shadowed by `slog`)
// * be able to initialize the slog logger using slog macros like o!()
#[macro_use] extern crate log;


mod args;
mod host;
mod logging;


use std::env;
use std::io::{self, Write};
use std::process::exit;

use exitcode::ExitCode;
use grift::{Action, CaptionError, Compositor, CompositorBuilder, DirectorySink, FileUpload,
            NoClipboard, TEMPLATES};

use args::{ArgsError, CaptionOptions, Command, Source};
use host::{PrintLauncher, TerminalNotifier};


lazy_static! {
    /// Application / package name, as filled out by Cargo.
    static ref NAME: &'static str = option_env!("CARGO_PKG_NAME").unwrap_or("griftsh");

    /// Application version, as filled out by Cargo,
    /// with the revision it was built from (if known).
    static ref VERSION: Option<String> = option_env!("CARGO_PKG_VERSION").map(|v| {
        match REVISION.trim() {
            "" => v.to_owned(),
            rev => format!("{} ({})", v, rev),
        }
    });
}

/// Revision of the source code, as written by the build script.
const REVISION: &str = include_str!(concat!(env!("OUT_DIR"), "/revision"));


fn main() {
    let opts = args::parse().unwrap_or_else(|e| {
        print_args_error(e);
        exit(exitcode::USAGE);
    });

    let _guard = logging::init(opts.verbosity).unwrap_or_else(|e| {
        let _ = writeln!(&mut io::stderr(), "Failed to initialize logging: {}", e);
        exit(exitcode::SOFTWARE);
    });
    if cfg!(debug_assertions) {
        warn!("Debug mode! The program will likely be much slower.");
    }
    for (i, arg) in env::args().enumerate() {
        debug!("argv[{}] = {:?}", i, arg);
    }
    trace!("Options parsed from argv:\n{:#?}", opts);

    let quiet = opts.quiet();
    let code = match opts.command {
        Command::Templates => list_templates(io::stdout()).map(|_| exitcode::OK)
            .unwrap_or_else(|e| {
                error!("Failed to list the templates: {}", e);
                exitcode::IOERR
            }),
        Command::Caption(caption_opts) => caption(caption_opts, quiet),
    };
    exit(code);
}

/// Print an error that may occur while parsing arguments.
fn print_args_error(e: ArgsError) {
    match e {
        // In case of generic parse error, clap knows best how to report it
        // (including --help and --version, which aren't really errors).
        ArgsError::Parse(e) => e.exit(),
        e => {
            let _ = writeln!(&mut io::stderr(), "Failed to parse arguments: {}", e);
        }
    }
}


/// Print the catalog of preset templates.
fn list_templates<W: Write>(mut output: W) -> io::Result<()> {
    for template in TEMPLATES.iter() {
        writeln!(output, "{:<12} {:<20} {}", template.name, template.label, template.url)?;
    }
    output.flush()
}

/// Caption an image according to the options and export it.
fn caption(opts: CaptionOptions, quiet: bool) -> ExitCode {
    let mut compositor = match CompositorBuilder::new()
        .template_directory(&opts.template_dir)
        .font_directory(&opts.font_dir)
        .export_format(opts.format)
        .style(opts.style.clone())
        .content(opts.content.clone())
        .notifier(TerminalNotifier::new(quiet))
        .build()
    {
        Ok(compositor) => compositor,
        Err(e) => {
            error!("Failed to set up the compositor: {}", e);
            return exitcode::CONFIG;
        }
    };

    let loaded = match opts.source {
        Source::File(ref path) => match FileUpload::from_file(path) {
            Ok(upload) => compositor.load_file(upload),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                return exitcode::NOINPUT;
            }
        },
        Source::Template(ref name) => compositor.load_template(name),
    };
    if let Err(e) = loaded {
        debug!("Loading the image failed: {}", e);
        return exit_code(&e);
    }

    let exported = match opts.output_dir {
        Some(ref dir) => compositor.download(&mut DirectorySink::new(dir))
            .map(|file_name| info!("Meme saved as {}", dir.join(file_name).display())),
        None => {
            trace!("No --output-dir given, using standard output");
            if isatty::stdout_isatty() {
                warn!("Standard output is a terminal.");
            }
            compositor.export(opts.format).and_then(|output| {
                let mut stdout = io::stdout();
                stdout.write_all(output.bytes()).and_then(|_| stdout.flush())
                    .map_err(|e| CaptionError::Delivery(Action::Download, e.into()))
            })
        }
    };
    if let Err(e) = exported {
        error!("Error while exporting the meme: {}", e);
        return exit_code(&e);
    }

    if opts.copy {
        if let Err(e) = copy(&mut compositor) {
            return exit_code(&e);
        }
    }
    if opts.share {
        // Standard output may be taken by the image itself.
        let shared = match opts.output_dir {
            Some(_) => compositor.share(&mut PrintLauncher::new(io::stdout())),
            None => compositor.share(&mut PrintLauncher::new(io::stderr())),
        };
        if let Err(e) = shared {
            return exit_code(&e);
        }
    }
    exitcode::OK
}

#[cfg(feature = "clipboard")]
fn copy(compositor: &mut Compositor) -> Result<(), CaptionError> {
    match host::SystemClipboard::new() {
        Ok(mut clipboard) => compositor.copy_to_clipboard(&mut clipboard),
        Err(e) => {
            warn!("Cannot access the system clipboard: {}", e);
            compositor.copy_to_clipboard(&mut NoClipboard)
        }
    }
}

#[cfg(not(feature = "clipboard"))]
fn copy(compositor: &mut Compositor) -> Result<(), CaptionError> {
    debug!("Built without clipboard support");
    compositor.copy_to_clipboard(&mut NoClipboard)
}

/// Exit code of the program for given captioning error.
fn exit_code(error: &CaptionError) -> ExitCode {
    match *error {
        CaptionError::InvalidInputType(_) | CaptionError::DecodeFailure(..) => exitcode::DATAERR,
        CaptionError::InvalidStyle(_) => exitcode::CONFIG,
        CaptionError::ClipboardUnsupported => exitcode::UNAVAILABLE,
        CaptionError::ExportSerializationFailure(_) => exitcode::CANTCREAT,
        CaptionError::Delivery(Action::Download, _) => exitcode::IOERR,
        CaptionError::Delivery(..) => exitcode::UNAVAILABLE,
        CaptionError::PreconditionFailed(_) | CaptionError::Render(_) => exitcode::SOFTWARE,
    }
}


#[cfg(test)]
mod tests {
    use std::io;

    use exitcode;
    use grift::{Action, CaptionError};
    use super::{exit_code, list_templates};

    #[test]
    fn lists_all_templates() {
        let mut output = vec![];
        list_templates(&mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(6, output.lines().count());
        assert!(output.lines().any(|l| l.starts_with("drake ")));
    }

    #[test]
    fn exit_codes() {
        assert_eq!(exitcode::DATAERR, exit_code(&CaptionError::InvalidInputType("text/plain".into())));
        assert_eq!(exitcode::UNAVAILABLE, exit_code(&CaptionError::ClipboardUnsupported));
        assert_eq!(exitcode::IOERR, exit_code(&CaptionError::Delivery(
            Action::Download, io::Error::new(io::ErrorKind::Other, "disk full").into())));
    }
}
