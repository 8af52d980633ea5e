//! Module connecting the compositor with the terminal environment.

use std::io::{self, Write};

use grift::{Cause, Level, Notification, Notifier, ShareLauncher};


/// Notifier which prints the notifications on standard error.
#[derive(Clone, Copy, Debug)]
pub struct TerminalNotifier {
    /// Whether to only print errors.
    quiet: bool,
}

impl TerminalNotifier {
    #[inline]
    pub fn new(quiet: bool) -> Self {
        TerminalNotifier{quiet}
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        if self.quiet && notification.level != Level::Error {
            return;
        }
        if let Err(e) = writeln!(&mut io::stderr(), "{}", notification) {
            warn!("Failed to print notification {:?}: {}", notification, e);
        }
    }
}


/// "Opens" share intents by printing their URL.
#[derive(Debug)]
pub struct PrintLauncher<W: Write> {
    output: W,
}

impl<W: Write> PrintLauncher<W> {
    #[inline]
    pub fn new(output: W) -> Self {
        PrintLauncher{output}
    }
}

impl<W: Write> ShareLauncher for PrintLauncher<W> {
    fn open(&mut self, url: &str) -> Result<(), Cause> {
        writeln!(self.output, "{}", url)?;
        self.output.flush()?;
        Ok(())
    }
}


#[cfg(feature = "clipboard")]
pub use self::clipboard::SystemClipboard;

#[cfg(feature = "clipboard")]
mod clipboard {
    use std::borrow::Cow;

    use arboard;
    use grift::{CaptionOutput, Cause, Clipboard};
    use image::RgbaImage;


    /// The clipboard of the operating system.
    pub struct SystemClipboard {
        inner: arboard::Clipboard,
    }

    impl SystemClipboard {
        pub fn new() -> Result<Self, arboard::Error> {
            let inner = arboard::Clipboard::new()?;
            Ok(SystemClipboard{inner})
        }
    }

    impl Clipboard for SystemClipboard {
        fn write_image(&mut self, pixels: &RgbaImage, _: &CaptionOutput) -> Result<(), Cause> {
            // arboard takes raw RGBA pixels rather than an encoded file.
            let (width, height) = pixels.dimensions();
            let data = arboard::ImageData{
                width: width as usize,
                height: height as usize,
                bytes: Cow::Borrowed(pixels.as_raw()),
            };
            self.inner.set_image(data)?;
            Ok(())
        }
    }
}


#[cfg(test)]
mod tests {
    use grift::ShareLauncher;
    use super::PrintLauncher;

    #[test]
    fn print_launcher_writes_url() {
        let mut output = vec![];
        PrintLauncher::new(&mut output).open("https://example.com/?q=1").unwrap();
        assert_eq!(b"https://example.com/?q=1\n".to_vec(), output);
    }
}
