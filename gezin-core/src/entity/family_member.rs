use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity, de, patch, patch_opt, require};
use crate::error::{GezinError, GezinResult};

wire_enum! {
    /// Role of a person in the household.
    MemberType {
        Child => "child",
        Parent => "parent",
        Grandparent => "grandparent",
        Babysitter => "babysitter",
    }
}

/// Default color handed out to new members.
pub const DEFAULT_MEMBER_COLOR: &str = "#3182ce";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: MemberType,
    #[serde(default, alias = "birthdate", deserialize_with = "de::optional_date")]
    pub birth_date: Option<NaiveDate>,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct NewFamilyMember {
    pub name: String,
    pub member_type: MemberType,
    pub birth_date: Option<NaiveDate>,
    pub color: String,
}

impl NewFamilyMember {
    pub fn new(name: impl Into<String>, member_type: MemberType) -> Self {
        NewFamilyMember {
            name: name.into(),
            member_type,
            birth_date: None,
            color: DEFAULT_MEMBER_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FamilyMemberPatch {
    pub name: Option<String>,
    pub member_type: Option<MemberType>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub color: Option<String>,
}

impl Entity for FamilyMember {
    const COLLECTION: Collection = Collection::FamilyMembers;
    type Draft = NewFamilyMember;
    type Patch = FamilyMemberPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewFamilyMember, _now: DateTime<Utc>) -> Self {
        FamilyMember {
            id,
            name: draft.name.trim().to_string(),
            member_type: draft.member_type,
            birth_date: draft.birth_date,
            color: draft.color,
        }
    }

    fn apply_patch(&mut self, p: FamilyMemberPatch, _now: DateTime<Utc>) {
        patch(&mut self.name, p.name);
        patch(&mut self.member_type, p.member_type);
        patch_opt(&mut self.birth_date, p.birth_date);
        patch(&mut self.color, p.color);
    }

    fn validate(&self) -> GezinResult<()> {
        require("name", &self.name)?;
        if !is_hex_color(&self.color) {
            return Err(GezinError::Validation(format!(
                "color '{}' is not a #rrggbb value",
                self.color
            )));
        }
        Ok(())
    }
}

pub(crate) fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_lowercase_columns_and_empty_birth_date() {
        let member: FamilyMember = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Anna",
            "type": "child",
            "birthdate": "",
            "color": "#3182ce"
        }))
        .unwrap();

        assert_eq!(member.member_type, MemberType::Child);
        assert_eq!(member.birth_date, None);
    }

    #[test]
    fn patch_can_clear_birth_date() {
        let mut member = FamilyMember::from_draft(
            "1".into(),
            NewFamilyMember {
                birth_date: NaiveDate::from_ymd_opt(2015, 6, 1),
                ..NewFamilyMember::new("Anna", MemberType::Child)
            },
            Utc::now(),
        );

        member.apply_patch(
            FamilyMemberPatch {
                birth_date: Some(None),
                ..Default::default()
            },
            Utc::now(),
        );

        assert_eq!(member.birth_date, None);
        assert_eq!(member.name, "Anna");
    }

    #[test]
    fn rejects_bad_color() {
        let mut member =
            FamilyMember::from_draft("1".into(), NewFamilyMember::new("Anna", MemberType::Child), Utc::now());
        member.color = "blue".into();
        assert!(member.validate().is_err());
    }
}
