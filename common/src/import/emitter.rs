use crate::model::diagnostic::Diagnostic;
use crate::model::record::ImportRecord;
use log::{debug, info, warn};

/// Collects resolved records in input order together with their diagnostics.
#[derive(Debug, Default)]
pub struct RowEmitter {
    records: Vec<ImportRecord>,
    diagnostics: Vec<Diagnostic>,
}

impl RowEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::HeaderWithoutColumnMap { .. } => warn!("{}", diagnostic),
            Diagnostic::DelimiterFallback { .. } => debug!("{}", diagnostic),
            _ => info!("{}", diagnostic),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn emit(&mut self, record: ImportRecord, diagnostics: Vec<Diagnostic>) {
        for d in diagnostics {
            self.note(d);
        }
        self.records.push(record);
    }

    pub fn finish(self) -> (Vec<ImportRecord>, Vec<Diagnostic>) {
        (self.records, self.diagnostics)
    }
}
