use crate::collection::{Collection, ListSettings, Listing};
use crate::crm::{Lead, Member, Rule, Service, Task, Wizard};

/// The list screens, in tab order.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Leads,
    Tasks,
    Rules,
    Team,
    Wizards,
    Services,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Leads,
        Screen::Tasks,
        Screen::Rules,
        Screen::Team,
        Screen::Wizards,
        Screen::Services,
    ];

    pub fn index(self) -> usize {
        match self {
            Screen::Leads => 0,
            Screen::Tasks => 1,
            Screen::Rules => 2,
            Screen::Team => 3,
            Screen::Wizards => 4,
            Screen::Services => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Leads => "Leads",
            Screen::Tasks => "Tasks",
            Screen::Rules => "Automation",
            Screen::Team => "Team",
            Screen::Wizards => "Wizards",
            Screen::Services => "Services",
        }
    }

    /// Lowercase name used in file names.
    ///
    pub fn slug(self) -> &'static str {
        match self {
            Screen::Leads => "leads",
            Screen::Tasks => "tasks",
            Screen::Rules => "rules",
            Screen::Team => "team",
            Screen::Wizards => "wizards",
            Screen::Services => "services",
        }
    }

    pub fn next(self) -> Screen {
        Screen::ALL[(self.index() + 1) % Screen::ALL.len()]
    }

    pub fn prev(self) -> Screen {
        Screen::ALL[(self.index() + Screen::ALL.len() - 1) % Screen::ALL.len()]
    }

    /// Return a fresh collection for this screen's row type.
    ///
    pub fn listing(self, settings: ListSettings) -> Box<dyn Listing> {
        match self {
            Screen::Leads => Box::new(Collection::<Lead>::new(settings)),
            Screen::Tasks => Box::new(Collection::<Task>::new(settings)),
            Screen::Rules => Box::new(Collection::<Rule>::new(settings)),
            Screen::Team => Box::new(Collection::<Member>::new(settings)),
            Screen::Wizards => Box::new(Collection::<Wizard>::new(settings)),
            Screen::Services => Box::new(Collection::<Service>::new(settings)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Screen::Services.next(), Screen::Leads);
        assert_eq!(Screen::Leads.prev(), Screen::Services);
        let mut screen = Screen::Leads;
        for _ in 0..Screen::ALL.len() {
            screen = screen.next();
        }
        assert_eq!(screen, Screen::Leads);
    }

    #[test]
    fn test_index_matches_order() {
        for (i, screen) in Screen::ALL.iter().enumerate() {
            assert_eq!(screen.index(), i);
        }
    }

    #[test]
    fn test_listing_endpoints() {
        let settings = ListSettings::default();
        assert_eq!(Screen::Rules.listing(settings).resource().path, "whatsapp/getRules");
        assert_eq!(Screen::Team.listing(settings).resource().items_key, "members");
        assert!(Screen::Leads.listing(settings).supports_date_range());
        assert!(!Screen::Wizards.listing(settings).supports_date_range());
        assert!(Screen::Services.listing(settings).filter_specs().is_empty());
    }
}
