use std::fmt::Write;

#[derive(Clone, Debug, PartialEq)]
pub struct TestResult {
    pub category: String,
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

/// Append-only log of assertion outcomes.
#[derive(Debug, Default)]
pub struct Recorder {
    results: Vec<TestResult>,
    echo: bool,
}

impl Recorder {
    /// A recorder that prints every outcome to stdout as it arrives.
    pub fn echoing() -> Self {
        Self {
            results: Vec::new(),
            echo: true,
        }
    }

    pub fn record(
        &mut self,
        category: &str,
        name: impl Into<String>,
        passed: bool,
        detail: impl Into<String>,
    ) {
        let result = TestResult {
            category: category.to_string(),
            name: name.into(),
            passed,
            detail: detail.into(),
        };
        if self.echo {
            println!("{}", result_line(&result));
        }
        self.results.push(result);
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn summary(&self) -> Summary {
        Summary::from_results(&self.results)
    }
}

fn result_line(result: &TestResult) -> String {
    let marker = if result.passed { "PASS" } else { "FAIL" };
    let mut line = format!("  [{}] [{}] {}", marker, result.category, result.name);
    if !result.passed && !result.detail.is_empty() {
        let _ = write!(line, "  ({})", result.detail);
    }
    line
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryTally {
    pub category: String,
    pub passed: usize,
    pub failed: usize,
}

impl CategoryTally {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

#[derive(Clone, Debug, Default)]
pub struct Summary {
    /// In order of first appearance.
    pub categories: Vec<CategoryTally>,
    pub failures: Vec<TestResult>,
}

impl Summary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let mut categories: Vec<CategoryTally> = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            let category = if result.category.is_empty() {
                "OTHER"
            } else {
                result.category.as_str()
            };
            let index = match categories.iter().position(|t| t.category == category) {
                Some(index) => index,
                None => {
                    categories.push(CategoryTally {
                        category: category.to_string(),
                        ..Default::default()
                    });
                    categories.len() - 1
                }
            };
            if result.passed {
                categories[index].passed += 1;
            } else {
                categories[index].failed += 1;
                failures.push(result.clone());
            }
        }
        Self {
            categories,
            failures,
        }
    }

    pub fn passed_count(&self) -> usize {
        self.categories.iter().map(|t| t.passed).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.categories.iter().map(|t| t.failed).sum()
    }

    pub fn total(&self) -> usize {
        self.passed_count() + self.failed_count()
    }

    pub fn passed(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(65);
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", rule);
        let _ = writeln!(out, "  RESULTS");
        let _ = writeln!(out, "{}", rule);
        for tally in &self.categories {
            let marker = if tally.failed == 0 { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "  [{}] {:20}  {}/{} passed",
                marker,
                tally.category,
                tally.passed,
                tally.total()
            );
        }
        let marker = if self.passed() { "PASS" } else { "FAIL" };
        let _ = writeln!(
            out,
            "\n  [{}] TOTAL: {}/{} passed, {} failed",
            marker,
            self.passed_count(),
            self.total(),
            self.failed_count()
        );
        if !self.failures.is_empty() {
            let _ = writeln!(out, "\n  FAILURES ({}):", self.failures.len());
            for failure in &self.failures {
                let _ = writeln!(out, "    [{}] {}", failure.category, failure.name);
                if !failure.detail.is_empty() {
                    let _ = writeln!(out, "       -> {}", failure.detail);
                }
            }
        }
        let _ = write!(out, "{}", rule);
        out
    }
}
