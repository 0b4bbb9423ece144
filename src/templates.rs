use crate::models::{Item, ItemKind, Items};

/// A named starter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTemplate {
    pub name: &'static str,
    /// Symbol name the host can map to an icon
    pub icon: &'static str,
    pub items: &'static [&'static str],
}

pub const BUILT_IN: [ListTemplate; 5] = [
    ListTemplate {
        name: "Grocery List",
        icon: "cart",
        items: &[
            "Fruits & Vegetables",
            "Dairy",
            "Meat",
            "Bread",
            "Snacks",
            "Beverages",
        ],
    },
    ListTemplate {
        name: "Packing List",
        icon: "suitcase",
        items: &[
            "Clothes",
            "Toiletries",
            "Electronics",
            "Documents",
            "Medications",
            "Chargers",
        ],
    },
    ListTemplate {
        name: "Meeting Agenda",
        icon: "person.3",
        items: &[
            "Welcome & Introductions",
            "Review action items",
            "Discussion topics",
            "Next steps",
            "Schedule follow-up",
        ],
    },
    ListTemplate {
        name: "Weekly Plan",
        icon: "calendar",
        items: &[
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ],
    },
    ListTemplate {
        name: "Project Checklist",
        icon: "hammer",
        items: &[
            "Define scope",
            "Research",
            "Design",
            "Implement",
            "Test",
            "Deploy",
            "Review",
        ],
    },
];

impl ListTemplate {
    /// Look up a built-in template by name, ignoring case
    #[must_use]
    pub fn find(name: &str) -> Option<&'static Self> {
        let name = name.trim();
        BUILT_IN
            .iter()
            .find(|template| template.name.eq_ignore_ascii_case(name))
    }

    /// Fresh items of `kind`, one per template line
    #[must_use]
    pub fn instantiate(&self, kind: ItemKind) -> Items {
        self.items.iter().map(|text| Item::new(kind, *text)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_built_ins_are_complete() {
        assert_eq!(BUILT_IN.len(), 5);
        for template in &BUILT_IN {
            assert!(!template.name.is_empty());
            assert!(!template.icon.is_empty());
            assert!(!template.items.is_empty());
        }
        let names: HashSet<_> = BUILT_IN.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), BUILT_IN.len());
    }

    #[test]
    fn test_find_ignores_case() {
        let template = ListTemplate::find("packing list").unwrap();
        assert_eq!(template.name, "Packing List");
        assert!(ListTemplate::find("Shopping").is_none());
    }

    #[test]
    fn test_instantiate_uses_kind() {
        let items = ListTemplate::find("Weekly Plan")
            .unwrap()
            .instantiate(ItemKind::Bullet);
        assert_eq!(items.len(), 7);
        assert_eq!(items[0].text, "Monday");
        assert_eq!(items[6].text, "Sunday");
        assert!(items.iter().all(|i| i.is_bullet() && i.indent_level == 0));
    }
}
