//! In-process fakes shared by the unit tests

use crate::api::{IntegrationApi, Page, PageRequest};
use crate::connector::{AuthorizationSurface, SurfaceHandle};
use crate::error::{Error, Result};
use crate::types::{Identity, IntegrationCredentials, IntegrationKind};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Canned backend answer
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail {
        status: u16,
        detail: Option<&'static str>,
    },
}

impl<T: Clone> Reply<T> {
    pub fn fail(status: u16, detail: Option<&'static str>) -> Self {
        Reply::Fail { status, detail }
    }

    fn produce(&self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Fail { status, detail } => {
                Err(Error::backend(*status, detail.map(ToString::to_string)))
            }
        }
    }
}

pub fn sample_credentials() -> IntegrationCredentials {
    IntegrationCredentials::new(json!({"access_token": "tok", "refresh_token": "ref"}))
}

pub fn identity() -> Identity {
    Identity::new("TestUser", "TestOrg")
}

/// Scriptable [`IntegrationApi`] that records every call
pub struct FakeApi {
    authorize: Reply<String>,
    credentials: Reply<Option<IntegrationCredentials>>,
    disconnect: Reply<()>,
    pages: Mutex<VecDeque<Reply<Page>>>,
    authorize_calls: AtomicUsize,
    credentials_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    page_requests: Mutex<Vec<(IntegrationKind, PageRequest)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            authorize: Reply::Ok("https://auth.example.com/oauth/authorize?state=abc".into()),
            credentials: Reply::Ok(Some(sample_credentials())),
            disconnect: Reply::Ok(()),
            pages: Mutex::new(VecDeque::new()),
            authorize_calls: AtomicUsize::new(0),
            credentials_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            page_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_authorize(mut self, reply: Reply<String>) -> Self {
        self.authorize = reply;
        self
    }

    pub fn with_credentials(mut self, reply: Reply<Option<IntegrationCredentials>>) -> Self {
        self.credentials = reply;
        self
    }

    pub fn with_disconnect(mut self, reply: Reply<()>) -> Self {
        self.disconnect = reply;
        self
    }

    pub fn with_pages(self, pages: Vec<Reply<Page>>) -> Self {
        *self.pages.lock().unwrap() = pages.into();
        self
    }

    pub fn authorize_calls(&self) -> usize {
        self.authorize_calls.load(Ordering::SeqCst)
    }

    pub fn credentials_calls(&self) -> usize {
        self.credentials_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn page_requests(&self) -> Vec<(IntegrationKind, PageRequest)> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntegrationApi for FakeApi {
    async fn authorize(&self, _kind: IntegrationKind, _identity: &Identity) -> Result<String> {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
        self.authorize.produce()
    }

    async fn fetch_credentials(
        &self,
        _kind: IntegrationKind,
        _identity: &Identity,
    ) -> Result<Option<IntegrationCredentials>> {
        self.credentials_calls.fetch_add(1, Ordering::SeqCst);
        self.credentials.produce()
    }

    async fn disconnect(&self, _kind: IntegrationKind, _identity: &Identity) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.disconnect.produce()
    }

    async fn fetch_page(&self, kind: IntegrationKind, request: &PageRequest) -> Result<Page> {
        self.page_requests
            .lock()
            .unwrap()
            .push((kind, request.clone()));
        let next = self.pages.lock().unwrap().pop_front();
        next.map_or_else(|| Ok(Page::default()), |reply| reply.produce())
    }
}

/// Surface whose handle reports closed after a fixed number of polls
pub struct ScriptedSurface {
    polls_before_close: usize,
    fail_open: bool,
    opened: Mutex<Vec<(String, String)>>,
    polls: Arc<AtomicUsize>,
}

impl ScriptedSurface {
    pub fn closing_after(polls_before_close: usize) -> Self {
        Self {
            polls_before_close,
            fail_open: false,
            opened: Mutex::new(Vec::new()),
            polls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::closing_after(0)
        }
    }

    /// (url, title) of every open call
    pub fn opened(&self) -> Vec<(String, String)> {
        self.opened.lock().unwrap().clone()
    }

    /// Total `is_closed` checks across all handles
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl AuthorizationSurface for ScriptedSurface {
    fn open(&self, url: &str, title: &str) -> Result<Box<dyn SurfaceHandle>> {
        if self.fail_open {
            return Err(Error::surface("popup blocked"));
        }
        self.opened
            .lock()
            .unwrap()
            .push((url.to_string(), title.to_string()));
        Ok(Box::new(CountdownHandle {
            remaining: AtomicUsize::new(self.polls_before_close),
            polls: Arc::clone(&self.polls),
        }))
    }
}

struct CountdownHandle {
    remaining: AtomicUsize,
    polls: Arc<AtomicUsize>,
}

impl SurfaceHandle for CountdownHandle {
    fn is_closed(&self) -> bool {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.remaining.load(Ordering::SeqCst);
        if remaining == 0 {
            return true;
        }
        self.remaining.store(remaining - 1, Ordering::SeqCst);
        false
    }
}
