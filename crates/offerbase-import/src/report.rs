/// Aggregate outcome of one import batch.
///
/// `valid` counts records that were actually persisted (inserted or
/// updated); a skipped duplicate is neither valid nor invalid. `errors`
/// holds one message per invalid or persistence-failed record.
#[derive(Debug, Default, Clone)]
pub struct ImportReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub updated: usize,
    pub new: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    /// Folds another report into this one (used by directory imports).
    pub fn absorb(&mut self, other: ImportReport) {
        self.total += other.total;
        self.valid += other.valid;
        self.invalid += other.invalid;
        self.updated += other.updated;
        self.new += other.new;
        self.skipped += other.skipped;
        self.errors.extend(other.errors);
    }

    /// Renders the summary with at most `max_errors` error lines, followed
    /// by an "... and N more" suffix when the list was capped.
    #[must_use]
    pub fn render(&self, max_errors: usize) -> String {
        let mut out = format!(
            "Processed {} coupons:\n  Valid: {}\n  Invalid: {}\n  Updated: {}\n  New: {}\n  Skipped: {}",
            self.total, self.valid, self.invalid, self.updated, self.new, self.skipped
        );

        if !self.errors.is_empty() {
            out.push_str("\n\nErrors:");
            for error in self.errors.iter().take(max_errors) {
                out.push_str("\n  - ");
                out.push_str(error);
            }
            if self.errors.len() > max_errors {
                out.push_str(&format!(
                    "\n  ... and {} more errors",
                    self.errors.len() - max_errors
                ));
            }
        }

        out
    }
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(10))
    }
}
