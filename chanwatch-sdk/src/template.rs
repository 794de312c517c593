//! Placeholder substitution for plot names, titles and file paths.
//!
//! Recognized placeholders: `%RUN%`, `%SUBRUN%`, `%EVENT%`, `%CHAN1%`,
//! `%CHAN2%`, `%CRNAME%`, `%CRLABEL%`. Unrecognized placeholders pass
//! through verbatim. `%STATUS%` is substituted separately: its presence in
//! the configured plot name requests one output per health class.

use chanwatch_types::{ChannelRange, ChannelStatus, EventId};

/// Placeholder that triggers status-split output naming.
pub const STATUS_PLACEHOLDER: &str = "%STATUS%";

/// Substitute event and range placeholders in a template.
pub fn substitute(template: &str, event: &EventId, range: &ChannelRange) -> String {
    substitute_with(
        template,
        &event.run.to_string(),
        &event.subrun.to_string(),
        &event.event.to_string(),
        range,
    )
}

/// Substitute with run, subrun and event spans, for summary naming.
///
/// A span renders as the single number when first and last agree, and as
/// `first-last` otherwise.
pub fn substitute_span(
    template: &str,
    runs: (u32, u32),
    subruns: (u32, u32),
    events: (u32, u32),
    range: &ChannelRange,
) -> String {
    substitute_with(
        template,
        &span_text(runs),
        &span_text(subruns),
        &span_text(events),
        range,
    )
}

/// Whether a template requests status-split outputs.
pub fn has_status_placeholder(template: &str) -> bool {
    template.contains(STATUS_PLACEHOLDER)
}

/// Replace the status placeholder with a status label.
pub fn substitute_status(name: &str, status: ChannelStatus) -> String {
    name.replace(STATUS_PLACEHOLDER, status.label())
}

fn span_text((first, last): (u32, u32)) -> String {
    if first == last {
        first.to_string()
    } else {
        format!("{first}-{last}")
    }
}

fn substitute_with(
    template: &str,
    run: &str,
    subrun: &str,
    event: &str,
    range: &ChannelRange,
) -> String {
    template
        .replace("%RUN%", run)
        .replace("%SUBRUN%", subrun)
        .replace("%EVENT%", event)
        .replace("%CHAN1%", &range.first.to_string())
        .replace("%CHAN2%", &range.last.to_string())
        .replace("%CRNAME%", &range.name)
        .replace("%CRLABEL%", &range.label)
}
