//! Table identifiers and the configured table set

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Tables of the `canvas` namespace replicated by default
pub const CANVAS_TABLES: &[&str] = &[
    "access_tokens",
    "account_users",
    "accounts",
    "assessment_question_banks",
    "assessment_questions",
    "assignment_groups",
    "assignment_override_students",
    "assignment_overrides",
    "assignments",
    "attachment_associations",
    "calendar_events",
    "comment_bank_items",
    "communication_channels",
    "content_migrations",
    "content_participation_counts",
    "content_participations",
    "content_shares",
    "content_tags",
    "context_external_tools",
    "context_module_progressions",
    "context_modules",
    "conversation_message_participants",
    "conversation_messages",
    "conversation_participants",
    "conversations",
    "course_account_associations",
    "course_sections",
    "courses",
    "custom_gradebook_column_data",
    "custom_gradebook_columns",
    "developer_key_account_bindings",
    "developer_keys",
    "discussion_entries",
    "discussion_entry_participants",
    "discussion_topic_participants",
    "discussion_topics",
    "enrollment_dates_overrides",
    "enrollment_states",
    "enrollment_terms",
    "enrollments",
    "favorites",
    "folders",
    "grading_period_groups",
    "grading_periods",
    "grading_standards",
    "group_categories",
    "group_memberships",
    "groups",
    "late_policies",
    "learning_outcome_groups",
    "learning_outcome_question_results",
    "learning_outcome_results",
    "learning_outcomes",
    "lti_line_items",
    "lti_resource_links",
    "lti_results",
    "originality_reports",
    "outcome_proficiencies",
    "outcome_proficiency_ratings",
    "post_policies",
    "pseudonyms",
    "quiz_groups",
    "quiz_questions",
    "quiz_submissions",
    "quizzes",
    "role_overrides",
    "roles",
    "rubric_assessments",
    "rubric_associations",
    "rubrics",
    "score_statistics",
    "scores",
    "submission_comments",
    "submission_versions",
    "submissions",
    "user_account_associations",
    "user_notes",
    "users",
    "web_conferences",
    "wiki_pages",
    "wikis",
];

/// Name of a remote table, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Validate and wrap a table name. Surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTableName.into());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TableName {
    type Error = crate::error::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

/// The fixed set of tables processed in one run
///
/// Duplicates are dropped, keeping the first occurrence. Processing order is
/// irrelevant but the configured order is preserved for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSet {
    tables: Vec<TableName>,
}

impl TableSet {
    /// Build a table set from raw names
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut tables = Vec::new();

        for name in names {
            let table = TableName::new(name)?;
            if seen.insert(table.clone()) {
                tables.push(table);
            } else {
                log::debug!("Dropping duplicate table '{table}'");
            }
        }

        Ok(Self { tables })
    }

    /// The default `canvas` namespace table set
    pub fn canvas() -> Self {
        Self {
            tables: CANVAS_TABLES
                .iter()
                .map(|name| TableName((*name).to_string()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableName> {
        self.tables.iter()
    }

    pub fn contains(&self, table: &TableName) -> bool {
        self.tables.contains(table)
    }
}

impl IntoIterator for TableSet {
    type Item = TableName;
    type IntoIter = std::vec::IntoIter<TableName>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}
