use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use unitpipe::engine::RunReport;
use unitpipe::notifier::Notifier;

/// Notifier that remembers every report it was handed.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    reports: Arc<Mutex<Vec<RunReport>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<RunReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify<'a>(&'a self, report: &'a RunReport) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        self.reports.lock().unwrap().push(report.clone());
        Box::pin(async {})
    }
}
