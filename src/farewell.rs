//! Farewell scripts played when the countdown ends or the process is
//! interrupted.
//!
//! Playback is blocking and paced with real sleeps; async callers run it on
//! a blocking thread so the runtime keeps servicing other tasks.

use std::io::{self, Write};
use std::time::Duration;

use crate::display::{DisplayFrame, DisplayHandle, Tone};

/// Pause between lines.
const LINE_PAUSE: Duration = Duration::from_secs(1);

/// Pause between dots.
const DOT_PAUSE: Duration = Duration::from_millis(200);

/// One scripted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Prints `>: <text>` and a newline.
    Line(&'static str),
    /// Prints the text as is.
    Text(&'static str),
    /// Prints this many dots, pausing before each.
    Dots(usize),
    /// Shows the text on the display only.
    Banner(&'static str),
    /// Waits.
    Pause(Duration),
}

/// Whether [`Script::play`] really sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// Sleep for every pause.
    #[default]
    Real,
    /// Skip all pauses.
    Immediate,
}

impl Pacing {
    fn wait(self, duration: Duration) {
        if self == Self::Real {
            std::thread::sleep(duration);
        }
    }
}

/// An ordered farewell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Played after the countdown reached zero.
    #[must_use]
    pub fn expiry() -> Self {
        Self {
            steps: vec![
                Step::Line("World dispatching stopped!"),
                Step::Pause(LINE_PAUSE),
                Step::Line("Critical mass reached..."),
                Step::Pause(LINE_PAUSE),
                Step::Line("The world ends now!"),
                Step::Pause(LINE_PAUSE),
                Step::Line("Good bye!"),
                Step::Pause(LINE_PAUSE),
                Step::Text(">: ."),
                Step::Dots(3),
                Step::Text("\n"),
                Step::Pause(LINE_PAUSE),
                Step::Banner("BOOOM!"),
                Step::Pause(LINE_PAUSE),
                Step::Line("Ok, just a joke. Only the program stops."),
                Step::Pause(LINE_PAUSE),
            ],
        }
    }

    /// Played after Ctrl-C or SIGTERM.
    #[must_use]
    pub fn interrupt() -> Self {
        Self {
            steps: vec![
                Step::Pause(LINE_PAUSE),
                Step::Text(">: Stop <countdown>"),
                Step::Dots(3),
                Step::Text(" OK\n"),
                Step::Pause(DOT_PAUSE),
                Step::Text(">: Stop <dispatch gate>"),
                Step::Dots(3),
                Step::Text(" OK\n"),
                Step::Pause(DOT_PAUSE),
                Step::Line("The world ends now!"),
                Step::Pause(LINE_PAUSE),
                Step::Line("Good bye!"),
                Step::Pause(LINE_PAUSE),
                Step::Text(">: ."),
                Step::Dots(3),
                Step::Text("\n"),
                Step::Pause(LINE_PAUSE),
                Step::Line("BOOOOM!"),
                Step::Pause(LINE_PAUSE),
                Step::Line("Ok, just a joke. Only the program stops."),
                Step::Pause(LINE_PAUSE),
            ],
        }
    }

    /// Steps in playback order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Total time spent pausing with [`Pacing::Real`].
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Pause(d) => *d,
                Step::Dots(n) => DOT_PAUSE * u32::try_from(*n).unwrap_or(u32::MAX),
                _ => Duration::ZERO,
            })
            .sum()
    }

    /// Plays the script, flushing after every step.
    ///
    /// # Errors
    ///
    /// Returns the first write error. Display pushes never fail.
    pub fn play(&self, out: &mut dyn Write, display: &DisplayHandle, pacing: Pacing) -> io::Result<()> {
        for step in &self.steps {
            match *step {
                Step::Line(text) => writeln!(out, ">: {text}")?,
                Step::Text(text) => out.write_all(text.as_bytes())?,
                Step::Dots(count) => {
                    for _ in 0..count {
                        out.flush()?;
                        pacing.wait(DOT_PAUSE);
                        out.write_all(b".")?;
                    }
                }
                Step::Banner(text) => {
                    display.push(DisplayFrame::new(text, Tone::Warning));
                }
                Step::Pause(duration) => {
                    out.flush()?;
                    pacing.wait(duration);
                }
            }
            out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(script: &Script) -> String {
        let mut out = Vec::new();
        script
            .play(&mut out, &DisplayHandle::detached(), Pacing::Immediate)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn expiry_output_order() {
        assert_eq!(
            render(&Script::expiry()),
            ">: World dispatching stopped!\n\
             >: Critical mass reached...\n\
             >: The world ends now!\n\
             >: Good bye!\n\
             >: ....\n\
             >: Ok, just a joke. Only the program stops.\n"
        );
    }

    #[test]
    fn interrupt_output_order() {
        assert_eq!(
            render(&Script::interrupt()),
            ">: Stop <countdown>... OK\n\
             >: Stop <dispatch gate>... OK\n\
             >: The world ends now!\n\
             >: Good bye!\n\
             >: ....\n\
             >: BOOOOM!\n\
             >: Ok, just a joke. Only the program stops.\n"
        );
    }

    #[test]
    fn banner_goes_to_display() {
        let (display, mut rx) = DisplayHandle::channel(8);
        let mut out = Vec::new();
        Script::expiry()
            .play(&mut out, &display, Pacing::Immediate)
            .unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            DisplayFrame::new("BOOOM!", Tone::Warning)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn only_expiry_uses_the_display() {
        let banners = |script: &Script| {
            script
                .steps()
                .iter()
                .filter(|step| matches!(step, Step::Banner(_)))
                .count()
        };
        assert_eq!(banners(&Script::expiry()), 1);
        assert_eq!(banners(&Script::interrupt()), 0);
        assert!(Script::interrupt().steps().contains(&Step::Line("BOOOOM!")));
    }

    #[test]
    fn interrupt_leaves_display_alone() {
        let (display, mut rx) = DisplayHandle::channel(8);
        let mut out = Vec::new();
        Script::interrupt()
            .play(&mut out, &display, Pacing::Immediate)
            .unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn real_pacing_duration() {
        assert_eq!(Script::expiry().duration(), Duration::from_millis(7_600));
    }

    #[test]
    fn write_failure_surfaces() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let err = Script::interrupt()
            .play(&mut Broken, &DisplayHandle::detached(), Pacing::Immediate)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
