use chrono::{Datelike, NaiveDate};

use crate::entity::{FamilyMember, MemberType};

/// Members grouped by type, in `MemberType::ALL` order. Empty groups are
/// left out.
pub fn group_by_type(members: &[FamilyMember]) -> Vec<(MemberType, Vec<&FamilyMember>)> {
    MemberType::ALL
        .iter()
        .filter_map(|&member_type| {
            let group: Vec<_> = members
                .iter()
                .filter(|m| m.member_type == member_type)
                .collect();
            (!group.is_empty()).then_some((member_type, group))
        })
        .collect()
}

pub fn children(members: &[FamilyMember]) -> Vec<&FamilyMember> {
    members
        .iter()
        .filter(|m| m.member_type == MemberType::Child)
        .collect()
}

pub fn find_member<'a>(members: &'a [FamilyMember], id: &str) -> Option<&'a FamilyMember> {
    members.iter().find(|m| m.id == id)
}

/// Resolve member ids to names, skipping ids that no longer exist.
pub fn member_names<'a>(members: &'a [FamilyMember], ids: &[String]) -> Vec<&'a str> {
    ids.iter()
        .filter_map(|id| find_member(members, id))
        .map(|m| m.name.as_str())
        .collect()
}

/// Age in whole years on `today`.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth_date > today {
        return None;
    }
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, NewFamilyMember};
    use chrono::Utc;

    fn member(id: &str, name: &str, member_type: MemberType) -> FamilyMember {
        FamilyMember::from_draft(id.into(), NewFamilyMember::new(name, member_type), Utc::now())
    }

    #[test]
    fn groups_in_type_order() {
        let members = [
            member("1", "Oma", MemberType::Grandparent),
            member("2", "Anna", MemberType::Child),
            member("3", "Mark", MemberType::Parent),
            member("4", "Tim", MemberType::Child),
        ];

        let groups = group_by_type(&members);
        let shape: Vec<_> = groups.iter().map(|(t, g)| (*t, g.len())).collect();
        assert_eq!(
            shape,
            [
                (MemberType::Child, 2),
                (MemberType::Parent, 1),
                (MemberType::Grandparent, 1)
            ]
        );
    }

    #[test]
    fn names_skip_dangling_ids() {
        let members = [member("1", "Anna", MemberType::Child)];
        let ids = ["1".to_string(), "gone".to_string()];
        assert_eq!(member_names(&members, &ids), ["Anna"]);
    }

    #[test]
    fn age_counts_birthdays() {
        let birth = NaiveDate::from_ymd_opt(2015, 6, 10).unwrap();
        let before = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        let on = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert_eq!(age_on(birth, before), Some(9));
        assert_eq!(age_on(birth, on), Some(10));
        assert_eq!(age_on(on, birth), None);
    }
}
