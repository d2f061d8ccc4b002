//! Reply-writing helpers
//!
//! A fixed catalogue of reply templates, trailing-phrase completion,
//! and `{{PLACEHOLDER}}` variables filled from the thread's [`Lead`].

use crate::error::{Error, Result};
use crate::model::Lead;
use std::fmt;
use std::str::FromStr;

/// Template grouping used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateCategory {
    FollowUp,
    Meeting,
    Pricing,
    Demo,
}

impl TemplateCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FollowUp => "follow-up",
            Self::Meeting => "meeting",
            Self::Pricing => "pricing",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "follow-up" => Ok(Self::FollowUp),
            "meeting" => Ok(Self::Meeting),
            "pricing" => Ok(Self::Pricing),
            "demo" => Ok(Self::Demo),
            other => Err(Error::Config(format!(
                "Invalid template category '{other}' (expected follow-up, meeting, pricing or demo)"
            ))),
        }
    }
}

/// A canned reply body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub category: TemplateCategory,
    pub content: &'static str,
}

const TEMPLATES: [ReplyTemplate; 5] = [
    ReplyTemplate {
        id: "1",
        title: "Initial Follow-up",
        category: TemplateCategory::FollowUp,
        content: "Thank you for your interest in our services. I'd be happy to schedule a call \
                  to discuss how we can help your business grow.",
    },
    ReplyTemplate {
        id: "2",
        title: "Meeting Confirmation",
        category: TemplateCategory::Meeting,
        content: "I'm confirming our meeting on {{DATE}} at {{TIME}}. Looking forward to \
                  discussing your needs in detail.",
    },
    ReplyTemplate {
        id: "3",
        title: "Pricing Information",
        category: TemplateCategory::Pricing,
        content: "As requested, here's our pricing information. Our basic package starts at \
                  $99/month and includes all the features you mentioned.",
    },
    ReplyTemplate {
        id: "4",
        title: "Thank You",
        category: TemplateCategory::FollowUp,
        content: "Thank you for taking the time to meet with us today. I've attached the \
                  resources we discussed and look forward to our next steps.",
    },
    ReplyTemplate {
        id: "5",
        title: "Product Demo",
        category: TemplateCategory::Demo,
        content: "I'd be happy to show you a demo of our product. Would {{DATE}} at {{TIME}} \
                  work for your schedule?",
    },
];

/// Every template, in catalogue order.
#[must_use]
pub const fn templates() -> &'static [ReplyTemplate] {
    &TEMPLATES
}

/// Templates in `category`, or all of them for `None`.
#[must_use]
pub fn templates_in(category: Option<TemplateCategory>) -> Vec<&'static ReplyTemplate> {
    TEMPLATES
        .iter()
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect()
}

/// Categories in order of first appearance in the catalogue.
#[must_use]
pub fn categories() -> Vec<TemplateCategory> {
    let mut seen = Vec::new();
    for template in &TEMPLATES {
        if !seen.contains(&template.category) {
            seen.push(template.category);
        }
    }
    seen
}

/// # Errors
///
/// Returns [`Error::TemplateNotFound`] for an unknown id.
pub fn find_template(id: &str) -> Result<&'static ReplyTemplate> {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::TemplateNotFound(id.to_string()))
}

const PHRASES: [(&str, &str); 8] = [
    ("thank", " you for your interest in our services."),
    ("looking forward", " to hearing from you soon."),
    ("please let", " me know if you have any questions."),
    ("i would be happy", " to schedule a call to discuss this further."),
    (
        "regarding your",
        " request, I've attached the information you asked for.",
    ),
    ("i hope", " this email finds you well."),
    ("as discussed", " during our meeting, here are the next steps."),
    ("i'm writing", " to follow up on our previous conversation."),
];

/// Completion for the phrase `text` ends with, compared
/// case-insensitively. The first matching trigger wins.
#[must_use]
pub fn suggest_completion(text: &str) -> Option<&'static str> {
    if text.is_empty() {
        return None;
    }
    let lower = text.to_lowercase();
    PHRASES
        .iter()
        .find(|(trigger, _)| lower.ends_with(trigger))
        .map(|(_, completion)| *completion)
}

/// `text` with its suggested completion appended, if there is one.
#[must_use]
pub fn complete(text: &str) -> String {
    suggest_completion(text).map_or_else(|| text.to_string(), |c| format!("{text}{c}"))
}

/// A lead field that can be dropped into a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    FirstName,
    LastName,
    Company,
    Email,
}

impl Variable {
    pub const ALL: [Self; 4] = [Self::FirstName, Self::LastName, Self::Company, Self::Email];

    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::FirstName => "{{FIRST_NAME}}",
            Self::LastName => "{{LAST_NAME}}",
            Self::Company => "{{COMPANY}}",
            Self::Email => "{{EMAIL}}",
        }
    }
}

/// Append `variable`'s placeholder to `body`.
#[must_use]
pub fn insert_variable(body: &str, variable: Variable) -> String {
    format!("{body}{}", variable.placeholder())
}

/// Values substituted into placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeContext {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl ComposeContext {
    /// Name, company and address from `lead`. The first word of the
    /// name is the first name; the rest is the last name.
    #[must_use]
    pub fn for_lead(lead: &Lead) -> Self {
        let name = lead.name.trim();
        let (first, last) = name.split_once(char::is_whitespace).unwrap_or((name, ""));
        Self {
            first_name: first.to_string(),
            last_name: last.trim().to_string(),
            company: lead.company.clone(),
            email: lead.email.clone(),
            date: None,
            time: None,
        }
    }

    fn value(&self, placeholder: &str) -> Option<&str> {
        match placeholder {
            "{{FIRST_NAME}}" => Some(self.first_name.as_str()),
            "{{LAST_NAME}}" => Some(self.last_name.as_str()),
            "{{COMPANY}}" => Some(self.company.as_str()),
            "{{EMAIL}}" => Some(self.email.as_str()),
            "{{DATE}}" => self.date.as_deref(),
            "{{TIME}}" => self.time.as_deref(),
            _ => None,
        }
    }
}

/// Replace every placeholder `context` has a value for. Others are
/// left in place; see [`unresolved`].
#[must_use]
pub fn expand(text: &str, context: &ComposeContext) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start..].find("}}") else {
            break;
        };
        let end = start + len + 2;
        out.push_str(&rest[..start]);
        let placeholder = &rest[start..end];
        out.push_str(context.value(placeholder).unwrap_or(placeholder));
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Placeholders still present in `text`, in order of appearance.
#[must_use]
pub fn unresolved(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start..].find("}}") else {
            break;
        };
        let end = start + len + 2;
        found.push(rest[start..end].to_string());
        rest = &rest[end..];
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::mock_threads;

    #[test]
    fn catalogue_has_five_templates() {
        let ids: Vec<&str> = templates().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn filter_by_category() {
        let follow_ups: Vec<&str> = templates_in(Some(TemplateCategory::FollowUp))
            .iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(follow_ups, vec!["Initial Follow-up", "Thank You"]);
        assert_eq!(templates_in(None).len(), 5);
    }

    #[test]
    fn categories_in_first_seen_order() {
        assert_eq!(
            categories(),
            vec![
                TemplateCategory::FollowUp,
                TemplateCategory::Meeting,
                TemplateCategory::Pricing,
                TemplateCategory::Demo,
            ]
        );
    }

    #[test]
    fn category_parse_round_trips() {
        for category in categories() {
            assert_eq!(category.as_str().parse::<TemplateCategory>().unwrap(), category);
        }
        assert!(matches!(
            "all".parse::<TemplateCategory>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn unknown_template_is_an_error() {
        assert_eq!(find_template("3").unwrap().title, "Pricing Information");
        assert!(matches!(find_template("9"), Err(Error::TemplateNotFound(ref id)) if id == "9"));
    }

    #[test]
    fn completion_matches_trailing_phrase() {
        assert_eq!(
            suggest_completion("Hi Shaw, I HOPE"),
            Some(" this email finds you well.")
        );
        assert_eq!(
            complete("Looking forward"),
            "Looking forward to hearing from you soon."
        );
    }

    #[test]
    fn completion_needs_phrase_at_end() {
        assert_eq!(suggest_completion(""), None);
        assert_eq!(suggest_completion("I hope so."), None);
        assert_eq!(complete("Regards"), "Regards");
    }

    #[test]
    fn insert_appends_placeholder() {
        let body = insert_variable("Hi ", Variable::FirstName);
        assert_eq!(body, "Hi {{FIRST_NAME}}");
        assert_eq!(Variable::ALL.len(), 4);
    }

    #[test]
    fn context_splits_lead_name() {
        let lead = Lead::for_thread(&mock_threads()[0]);
        let context = ComposeContext::for_lead(&lead);

        assert_eq!(context.first_name, "Mitrajit");
        assert_eq!(context.last_name, "Chandra");
        assert_eq!(context.company, "ReachInbox");
        assert_eq!(context.email, "mitrajit2022@gmail.com");
    }

    #[test]
    fn expand_fills_known_placeholders() {
        let lead = Lead::for_thread(&mock_threads()[1]);
        let context = ComposeContext::for_lead(&lead);

        let text = "Hi {{FIRST_NAME}} {{LAST_NAME}} of {{COMPANY}} ({{EMAIL}})";
        assert_eq!(
            expand(text, &context),
            "Hi Shaw Adley of ReachInbox (shaw@getmemeetings.com)"
        );
    }

    #[test]
    fn expand_keeps_missing_values() {
        let context = ComposeContext {
            date: Some("Friday".to_string()),
            ..ComposeContext::default()
        };
        let text = find_template("2").unwrap().content;

        let expanded = expand(text, &context);
        assert!(expanded.starts_with("I'm confirming our meeting on Friday at {{TIME}}."));
        assert_eq!(unresolved(&expanded), vec!["{{TIME}}"]);
        assert_eq!(expand("{{UNKNOWN}} and {{", &context), "{{UNKNOWN}} and {{");
    }
}
