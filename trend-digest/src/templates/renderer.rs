//! Markdown renderer for summaries and the daily report.

use super::TemplateError;
use crate::acquisition::AcquisitionResult;
use crate::format::{star_rating, thousands};
use crate::summary::{ProjectSummary, SummarizationOutcome};
use handlebars::{
    handlebars_helper, no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
};
use serde_json::json;

const SUMMARY_TEMPLATE: &str = "summary";
const REPORT_TEMPLATE: &str = "report";

const SUMMARY_MARKDOWN: &str = r#"### [{{repo.name}}]({{repo.url}}){{#if is_top_pick}} 🏆 **Top Pick**{{/if}}

> {{headline}}

- **Language**: {{repo.language}} | **Stars**: {{thousands repo.stars}} | **Today**: +{{thousands repo.stars_today}}
- **Rating**: {{stars score}} ({{score}}/5) - {{score_reason}}

**Core features**:
{{#each core_features}}
  - {{this}}
{{/each}}

**Use case**: {{use_case}}
{{#if failure_reason}}

> ⚠️ Summary degraded: {{failure_reason}}
{{/if}}

---
"#;

const REPORT_MARKDOWN: &str = r#"# 🔥 GitHub Trending Digest | {{date}}

> Source: {{source}}{{#if (eq source "secondary-api")}} (search API fallback, no daily star data){{/if}} | Repositories: {{total}} | Top picks: {{top_pick_count}} | Degraded: {{degraded}}

## 🏆 Top Picks

{{#if top_picks}}
{{#each top_picks}}
{{this}}
{{/each}}
{{else}}
_No top picks today._
{{/if}}

## 👀 Quick Looks

{{#if quick_looks}}
{{#each quick_looks}}
{{this}}
{{/each}}
{{else}}
_Nothing else today._
{{/if}}

_Generated at {{generated_at}} UTC_
"#;

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
/// - `eq`, `thousands` and `stars` helpers
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);

    hbs.register_helper("eq", Box::new(eq_helper));
    hbs.register_helper("thousands", Box::new(thousands_helper));
    hbs.register_helper("stars", Box::new(stars_helper));

    hbs
}

/// Equality comparison for any two JSON values.
///
/// Usage: `{{#if (eq variable "value")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let equal = match (h.param(0), h.param(1)) {
        (Some(a), Some(b)) => a.value() == b.value(),
        _ => false,
    };

    out.write(if equal { "true" } else { "" })?;
    Ok(())
}

handlebars_helper!(thousands_helper: |value: u64| thousands(value));
handlebars_helper!(stars_helper: |score: u64| star_rating(score.min(5) as u8));

/// Renders summaries and reports.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Creates a renderer with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in template fails to compile.
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = create_handlebars_registry();
        handlebars.register_template_string(SUMMARY_TEMPLATE, SUMMARY_MARKDOWN)?;
        handlebars.register_template_string(REPORT_TEMPLATE, REPORT_MARKDOWN)?;
        Ok(Self { handlebars })
    }

    /// Renders one summary as a markdown block.
    ///
    /// Degraded summaries carry a visible `⚠️ Summary degraded` marker.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_summary(&self, summary: &ProjectSummary) -> Result<String, TemplateError> {
        Ok(self.handlebars.render(SUMMARY_TEMPLATE, summary)?)
    }

    /// Renders the daily report.
    ///
    /// # Arguments
    ///
    /// * `acquisition` - Supplies the date and the source tag
    /// * `outcome` - The summaries to list
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_report(
        &self,
        acquisition: &AcquisitionResult,
        outcome: &SummarizationOutcome,
    ) -> Result<String, TemplateError> {
        let top_picks = self.render_all(&outcome.top_picks)?;
        let quick_looks = self.render_all(&outcome.quick_looks)?;

        let data = json!({
            "date": acquisition.timestamp.format("%Y-%m-%d").to_string(),
            "generated_at": acquisition.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            "source": acquisition.source_tag.as_str(),
            "total": outcome.len(),
            "top_pick_count": outcome.top_picks.len(),
            "degraded": outcome.degraded_count(),
            "top_picks": top_picks,
            "quick_looks": quick_looks,
        });

        Ok(self.handlebars.render(REPORT_TEMPLATE, &data)?)
    }

    fn render_all(&self, summaries: &[ProjectSummary]) -> Result<Vec<String>, TemplateError> {
        summaries.iter().map(|s| self.render_summary(s)).collect()
    }
}
