//! Reference identifier recognition.
//!
//! A reference identifier is the short human handle of an entity, such as `EP-001` or `req-45`.
//! Matching is case-insensitive and tolerates surrounding ASCII whitespace, but the whole trimmed
//! input must be a single identifier.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::EntityKind;

const REFERENCE_ID_PATTERN: &str = r"(?i)^(EP|US|REQ|AC|STD)-([0-9]+)$";

static REFERENCE_ID: LazyLock<Result<Regex, regex::Error>> =
	LazyLock::new(|| Regex::new(REFERENCE_ID_PATTERN));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceIdPattern {
	pub is_reference_id: bool,
	/// Serialized as `""` when the input is not a reference identifier.
	#[serde(serialize_with = "serialize_entity_type")]
	pub entity_type: Option<EntityKind>,
	/// Digit run exactly as written, zero padding included. Empty when not a reference.
	pub number: String,
	/// The caller's input, untrimmed.
	pub original_query: String,
}
impl ReferenceIdPattern {
	/// Entity type as a wire string, empty when the input is not a reference identifier.
	pub fn entity_type_str(&self) -> &'static str {
		self.entity_type.map(EntityKind::as_str).unwrap_or("")
	}

	/// Uppercase `PREFIX-digits` form, used for case-insensitive lookups.
	pub fn canonical(&self) -> Option<String> {
		let prefix = self.entity_type?.reference_prefix()?;

		Some(format!("{prefix}-{}", self.number))
	}
}

fn serialize_entity_type<S>(value: &Option<EntityKind>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(value.map(EntityKind::as_str).unwrap_or(""))
}

pub fn detect(query: &str) -> ReferenceIdPattern {
	match split_reference(query.trim_ascii()) {
		Some((kind, number)) => ReferenceIdPattern {
			is_reference_id: true,
			entity_type: Some(kind),
			number: number.to_string(),
			original_query: query.to_string(),
		},
		None => ReferenceIdPattern {
			is_reference_id: false,
			entity_type: None,
			number: String::new(),
			original_query: query.to_string(),
		},
	}
}

pub fn is_valid(query: &str) -> bool {
	split_reference(query.trim_ascii()).is_some()
}

pub fn entity_type_of(query: &str) -> Option<EntityKind> {
	split_reference(query.trim_ascii()).map(|(kind, _)| kind)
}

pub fn canonical(query: &str) -> Option<String> {
	detect(query).canonical()
}

fn split_reference(trimmed: &str) -> Option<(EntityKind, &str)> {
	let re = REFERENCE_ID.as_ref().ok()?;
	let captures = re.captures(trimmed)?;
	let kind = EntityKind::from_reference_prefix(captures.get(1)?.as_str())?;
	let number = captures.get(2)?.as_str();

	Some((kind, number))
}
