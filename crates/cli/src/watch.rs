use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;
use std::time::SystemTime;

use mrlens_vis::overlay::PageEvent;
use tracing::debug;

/// Starts watching the page at `path`.
///
/// The returned channel first carries the startup event, then a content
/// change event every time the modification time of the file changes. The
/// file is checked every `interval`. Watching stops once the receiver is
/// dropped.
pub(crate) fn watch_page(path: PathBuf, interval: Duration) -> Receiver<PageEvent> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut last_modified = modified(&path);

        if sender.send(PageEvent::StartupTimer).is_err() {
            return;
        }

        loop {
            thread::sleep(interval);

            let current = modified(&path);
            if current == last_modified {
                continue;
            }

            debug!(path = %path.display(), "the page has changed");
            last_modified = current;

            if sender.send(PageEvent::ContentChanged).is_err() {
                break;
            }
        }
    });

    receiver
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|metadata| metadata.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_comes_first_then_changes() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("history.html");

        let events = watch_page(path.clone(), Duration::from_millis(10));
        assert_eq!(events.recv_timeout(Duration::from_secs(5)), Ok(PageEvent::StartupTimer));

        fs::write(&path, "<html></html>")?;

        assert_eq!(events.recv_timeout(Duration::from_secs(5)), Ok(PageEvent::ContentChanged));
        Ok(())
    }
}
