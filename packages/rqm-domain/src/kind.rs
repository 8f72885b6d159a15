use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
	Epic,
	UserStory,
	AcceptanceCriteria,
	Requirement,
	RequirementType,
	SteeringDocument,
}
impl EntityKind {
	/// Kinds that take part in cross-entity search, in retrieval order.
	pub const SEARCHABLE: [Self; 4] =
		[Self::Epic, Self::UserStory, Self::AcceptanceCriteria, Self::Requirement];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Epic => "epic",
			Self::UserStory => "user_story",
			Self::AcceptanceCriteria => "acceptance_criteria",
			Self::Requirement => "requirement",
			Self::RequirementType => "requirement_type",
			Self::SteeringDocument => "steering_document",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Epic => "Epic",
			Self::UserStory => "User story",
			Self::AcceptanceCriteria => "Acceptance criteria",
			Self::Requirement => "Requirement",
			Self::RequirementType => "Requirement type",
			Self::SteeringDocument => "Steering document",
		}
	}

	/// Uppercase prefix of this kind's reference identifiers. Requirement types have none.
	pub fn reference_prefix(self) -> Option<&'static str> {
		match self {
			Self::Epic => Some("EP"),
			Self::UserStory => Some("US"),
			Self::AcceptanceCriteria => Some("AC"),
			Self::Requirement => Some("REQ"),
			Self::SteeringDocument => Some("STD"),
			Self::RequirementType => None,
		}
	}

	pub fn from_reference_prefix(prefix: &str) -> Option<Self> {
		match prefix.to_ascii_uppercase().as_str() {
			"EP" => Some(Self::Epic),
			"US" => Some(Self::UserStory),
			"AC" => Some(Self::AcceptanceCriteria),
			"REQ" => Some(Self::Requirement),
			"STD" => Some(Self::SteeringDocument),
			_ => None,
		}
	}

	pub fn is_searchable(self) -> bool {
		Self::SEARCHABLE.contains(&self)
	}
}
impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
