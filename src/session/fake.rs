//! Scripted browser for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::SiteConfig;
use crate::session::{Browser, FieldSpec, LaunchOptions, PageSession, Record};

/// Canned content for one URL.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    /// Items returned by `extract_list`
    pub items: Vec<Record>,
    /// Selector to text for `extract_field`
    pub fields: HashMap<String, String>,
}

impl FakePage {
    /// Listing page with a results container holding `items`.
    pub fn listing(items: Vec<Record>) -> Self {
        let mut fields = HashMap::new();
        fields.insert(SiteConfig::default().results_selector, String::new());
        Self { items, fields }
    }

    /// Listing page without a results container.
    pub fn empty_listing() -> Self {
        Self::default()
    }

    /// Detail page whose availability header reads `header`.
    pub fn detail(header: Option<&str>) -> Self {
        let mut fields = HashMap::new();
        if let Some(text) = header {
            fields.insert(
                SiteConfig::default().availability_selector,
                text.to_string(),
            );
        }
        Self {
            items: Vec::new(),
            fields,
        }
    }
}

#[derive(Debug, Default)]
pub struct Script {
    pub pages: HashMap<String, FakePage>,
    pub failing: HashSet<String>,
    pub navigations: Vec<String>,
    pub launches: usize,
    pub closes: usize,
    pub headless: Vec<bool>,
    pub failing_close: bool,
}

/// Browser serving [`FakePage`]s and recording every visit.
#[derive(Clone, Default)]
pub struct ScriptedBrowser {
    pub script: Arc<Mutex<Script>>,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, page: FakePage) -> Self {
        self.script.lock().unwrap().pages.insert(url.into(), page);
        self
    }

    pub fn failing(self, url: impl Into<String>) -> Self {
        self.script.lock().unwrap().failing.insert(url.into());
        self
    }

    /// Every session close is counted, then reported as failed.
    pub fn failing_close(self) -> Self {
        self.script.lock().unwrap().failing_close = true;
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.script.lock().unwrap().navigations.clone()
    }

    pub fn launches(&self) -> usize {
        self.script.lock().unwrap().launches
    }

    pub fn closes(&self) -> usize {
        self.script.lock().unwrap().closes
    }

    /// `headless` flag of each launch, in order.
    pub fn headless(&self) -> Vec<bool> {
        self.script.lock().unwrap().headless.clone()
    }

    pub fn session(&self) -> ScriptedSession {
        ScriptedSession {
            script: Arc::clone(&self.script),
            current: None,
        }
    }
}

#[async_trait]
impl Browser for ScriptedBrowser {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageSession>> {
        {
            let mut script = self.script.lock().unwrap();
            script.launches += 1;
            script.headless.push(options.headless);
        }
        Ok(Box::new(self.session()))
    }
}

pub struct ScriptedSession {
    script: Arc<Mutex<Script>>,
    current: Option<FakePage>,
}

impl ScriptedSession {
    fn page(&self) -> Result<&FakePage> {
        self.current
            .as_ref()
            .ok_or_else(|| AppError::extraction("session", "no document loaded"))
    }
}

#[async_trait]
impl PageSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let mut script = self.script.lock().unwrap();
        script.navigations.push(url.to_string());
        if script.failing.contains(url) {
            return Err(AppError::navigation(url, "connection refused"));
        }
        let page = script
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::navigation(url, "404 Not Found"))?;
        self.current = Some(page);
        Ok(())
    }

    async fn extract_list(
        &mut self,
        _item_selector: &str,
        fields: &[FieldSpec],
    ) -> Result<Vec<Record>> {
        let page = self.page()?;
        for (index, item) in page.items.iter().enumerate() {
            if let Some(field) = fields.iter().find(|f| !item.contains_key(&f.name)) {
                return Err(AppError::extraction(
                    "scripted page",
                    format!("item {index} has no '{}'", field.name),
                ));
            }
        }
        Ok(page.items.clone())
    }

    async fn extract_field(&mut self, selector: &str) -> Result<Option<String>> {
        Ok(self.page()?.fields.get(selector).cloned())
    }

    async fn close(&mut self) -> Result<()> {
        let mut script = self.script.lock().unwrap();
        script.closes += 1;
        self.current = None;
        if script.failing_close {
            return Err(AppError::navigation("session", "browser crashed"));
        }
        Ok(())
    }
}

/// Listing record with every field the paginator asks for.
pub fn course_record(title: &str, path: &str) -> Record {
    [
        ("title", title),
        ("url", path),
        ("address", "Church Road, London"),
        ("date", "Sat 3 Nov 2026"),
        ("time", "10:00 - 11:00"),
        ("price", "£90.00"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
