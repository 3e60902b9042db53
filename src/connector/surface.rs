//! Authorization surfaces
//!
//! The OAuth consent page is shown out of band (a browser window, a
//! printed link...). The connector only needs to open it and later ask
//! whether the user is done with it.

use crate::error::{Error, Result};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something that can present an authorization URL to the user
pub trait AuthorizationSurface: Send + Sync {
    /// Present `url`. `title` names the integration being authorized.
    fn open(&self, url: &str, title: &str) -> Result<Box<dyn SurfaceHandle>>;
}

/// A presented authorization page
pub trait SurfaceHandle: Send {
    /// Whether the user has finished with the page
    fn is_closed(&self) -> bool;
}

/// Handle backed by a shared flag
#[derive(Debug, Clone, Default)]
pub struct FlagHandle {
    closed: Arc<AtomicBool>,
}

impl FlagHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl SurfaceHandle for FlagHandle {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Prints the URL and treats the page as closed once the user presses Enter
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSurface;

impl AuthorizationSurface for ConsoleSurface {
    fn open(&self, url: &str, title: &str) -> Result<Box<dyn SurfaceHandle>> {
        println!("Open this URL to authorize {title}:\n\n    {url}\n");
        println!("Press Enter once the authorization window has closed.");

        let handle = FlagHandle::new();
        let signal = handle.clone();
        std::thread::Builder::new()
            .name("authorization-wait".to_string())
            .spawn(move || {
                let mut line = String::new();
                // EOF or a read error also ends the wait
                let _ = std::io::stdin().lock().read_line(&mut line);
                signal.close();
            })
            .map_err(|e| Error::surface(e.to_string()))?;

        Ok(Box::new(handle))
    }
}
