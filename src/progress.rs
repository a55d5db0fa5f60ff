use tracing::{info, warn};

/// Reports how far along a release is, one task at a time.
pub(crate) trait Progress {
    fn start(&mut self, message: String);
    fn succeed(&mut self);
    fn fail(&mut self);

    /// Close out the current task the way `result` went, passing `result` along.
    fn finish<T, E>(&mut self, result: Result<T, E>) -> Result<T, E>
    where
        Self: Sized,
    {
        match &result {
            Ok(_) => self.succeed(),
            Err(_) => self.fail(),
        }
        result
    }
}

/// Sends progress through `tracing`, so it ends up on stderr next to everything else.
#[derive(Debug, Default)]
pub(crate) struct Log {
    current: Option<String>,
}

impl Progress for Log {
    fn start(&mut self, message: String) {
        info!("{message}");
        self.current = Some(message);
    }

    fn succeed(&mut self) {
        if let Some(message) = self.current.take() {
            info!("✔ {message}");
        }
    }

    fn fail(&mut self) {
        if let Some(message) = self.current.take() {
            warn!("✖ {message}");
        }
    }
}
