use super::models::{Column, FilterSpec, Resource, Row};
use fake::Dummy;
use serde::{Deserialize, Deserializer, Serialize};

/// Text shown in a table cell for a field value.
///
pub trait CellText {
    fn cell_text(&self) -> String;
}

impl CellText for String {
    fn cell_text(&self) -> String {
        self.clone()
    }
}

impl CellText for Option<String> {
    fn cell_text(&self) -> String {
        self.clone().unwrap_or_else(|| "-".to_string())
    }
}

impl CellText for bool {
    fn cell_text(&self) -> String {
        let text = if *self { "yes" } else { "no" };
        text.to_string()
    }
}

impl CellText for u32 {
    fn cell_text(&self) -> String {
        self.to_string()
    }
}

impl CellText for f64 {
    fn cell_text(&self) -> String {
        format!("{:.2}", self)
    }
}

/// Read a field that the API may send as `null`, falling back to the
/// type's default.
///
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Declare a row struct for a collection endpoint along with its columns.
///
/// Every field is optional on the wire and may be `null`. `_id` is
/// accepted for `id`.
macro_rules! row {
    ($name:ident $path:literal $items:literal {
        $( $field:ident : $ty:ty => $title:literal $width:literal ),* $(,)?
    } $( filters: $filters:expr, )? $( date_range: $date_range:expr, )?) => {
        #[derive(Clone, Debug, Default, Dummy, PartialEq, Serialize, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            #[serde(alias = "_id", deserialize_with = "null_as_default")]
            pub id: String,
            $(
                #[serde(deserialize_with = "null_as_default")]
                pub $field: $ty,
            )*
        }

        impl Row for $name {
            const RESOURCE: Resource = Resource {
                path: $path,
                items_key: $items,
            };

            fn columns() -> &'static [Column] {
                &[ $( Column { title: $title, width: $width }, )* ]
            }

            fn cells(&self) -> Vec<String> {
                vec![ $( self.$field.cell_text(), )* ]
            }

            $(
                fn filters() -> &'static [FilterSpec] {
                    $filters
                }
            )?

            $(
                fn supports_date_range() -> bool {
                    $date_range
                }
            )?
        }
    };
}

const LEAD_FILTERS: &[FilterSpec] = &[FilterSpec {
    key: "status",
    label: "Status",
    options: &["new", "contacted", "qualified", "converted", "lost"],
}];

const TASK_FILTERS: &[FilterSpec] = &[
    FilterSpec {
        key: "status",
        label: "Status",
        options: &["pending", "in_progress", "completed"],
    },
    FilterSpec {
        key: "priority",
        label: "Priority",
        options: &["low", "medium", "high"],
    },
];

const RULE_FILTERS: &[FilterSpec] = &[FilterSpec {
    key: "isActive",
    label: "Active",
    options: &["true", "false"],
}];

const MEMBER_FILTERS: &[FilterSpec] = &[FilterSpec {
    key: "role",
    label: "Role",
    options: &["admin", "manager", "agent"],
}];

row!(Lead "lead/getLeads" "leads" {
    name: String => "Name" 22,
    phone: Option<String> => "Phone" 16,
    email: Option<String> => "Email" 26,
    status: String => "Status" 12,
    source: Option<String> => "Source" 12,
    assigned_to: Option<String> => "Owner" 16,
    created_at: Option<String> => "Created" 20,
} filters: LEAD_FILTERS, date_range: true,);

row!(Task "task/getTasks" "tasks" {
    title: String => "Title" 28,
    status: String => "Status" 12,
    priority: String => "Priority" 10,
    due_date: Option<String> => "Due" 20,
    assigned_to: Option<String> => "Assignee" 16,
    lead_name: Option<String> => "Lead" 18,
} filters: TASK_FILTERS, date_range: true,);

row!(Rule "whatsapp/getRules" "rules" {
    name: String => "Name" 24,
    trigger: String => "Trigger" 18,
    template: Option<String> => "Template" 24,
    delay_minutes: u32 => "Delay (min)" 11,
    is_active: bool => "Active" 8,
} filters: RULE_FILTERS,);

row!(Member "team/getTeamMembers" "members" {
    name: String => "Name" 22,
    email: String => "Email" 26,
    phone: Option<String> => "Phone" 16,
    role: String => "Role" 10,
    is_active: bool => "Active" 8,
} filters: MEMBER_FILTERS,);

row!(Wizard "wizard/getWizards" "wizards" {
    name: String => "Name" 24,
    description: Option<String> => "Description" 36,
    steps: u32 => "Steps" 6,
    updated_at: Option<String> => "Updated" 20,
});

row!(Service "service/getServices" "services" {
    name: String => "Name" 24,
    category: Option<String> => "Category" 16,
    price: f64 => "Price" 10,
    currency: Option<String> => "Currency" 8,
    is_active: bool => "Active" 8,
});

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lead_decodes_partial_record() {
        let lead: Lead = serde_json::from_value(json!({
            "_id": "65a1",
            "name": "Jane Roe",
            "assignedTo": "Sam",
            "unknownField": 42
        }))
        .unwrap();
        assert_eq!(lead.id, "65a1");
        assert_eq!(lead.assigned_to.as_deref(), Some("Sam"));
        assert_eq!(lead.phone, None);
        assert_eq!(lead.status, "");
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let lead: Lead = serde_json::from_value(json!({
            "_id": "1",
            "name": null,
            "status": null,
            "phone": null
        }))
        .unwrap();
        assert_eq!(lead.id, "1");
        assert_eq!(lead.name, "");
        assert_eq!(lead.phone, None);

        let rule: Rule = serde_json::from_value(json!({
            "_id": null,
            "delayMinutes": null,
            "isActive": null
        }))
        .unwrap();
        assert_eq!(rule.id, "");
        assert_eq!(rule.delay_minutes, 0);
        assert!(!rule.is_active);

        let service: Service = serde_json::from_value(json!({ "price": null })).unwrap();
        assert_eq!(service.price, 0.0);
    }

    #[test]
    fn test_cells_follow_columns() {
        let lead = Lead {
            id: "1".to_string(),
            name: "Jane Roe".to_string(),
            phone: Some("+1 555 0100".to_string()),
            status: "new".to_string(),
            ..Lead::default()
        };
        let cells = lead.cells();
        assert_eq!(cells.len(), Lead::columns().len());
        assert_eq!(cells[0], "Jane Roe");
        assert_eq!(cells[1], "+1 555 0100");
        assert_eq!(cells[2], "-");
        assert_eq!(cells[3], "new");
    }

    #[test]
    fn test_cell_text_formats() {
        assert_eq!(true.cell_text(), "yes");
        assert_eq!(false.cell_text(), "no");
        assert_eq!(12.5f64.cell_text(), "12.50");
        assert_eq!(7u32.cell_text(), "7");
    }

    #[test]
    fn test_resource_metadata() {
        assert_eq!(Lead::RESOURCE.path, "lead/getLeads");
        assert_eq!(Member::RESOURCE.items_key, "members");
        assert!(Lead::supports_date_range());
        assert!(Task::supports_date_range());
        assert!(!Rule::supports_date_range());
        assert_eq!(Task::filters().len(), 2);
        assert!(Wizard::filters().is_empty());
        assert!(Service::filters().is_empty());
    }

    #[test]
    fn test_every_row_has_matching_cells() {
        assert_eq!(Task::default().cells().len(), Task::columns().len());
        assert_eq!(Rule::default().cells().len(), Rule::columns().len());
        assert_eq!(Member::default().cells().len(), Member::columns().len());
        assert_eq!(Wizard::default().cells().len(), Wizard::columns().len());
        assert_eq!(Service::default().cells().len(), Service::columns().len());
    }
}
