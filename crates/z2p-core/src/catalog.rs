//! Room template pool
//!
//! Generation only needs an enumerable set of immutable templates plus a few
//! lookups; [`RoomPool`] is that seam. [`RoomCatalog`] is the in-memory
//! implementation, loadable from JSON.

use std::path::Path;

use hashbrown::HashMap;

use crate::error::CatalogError;
use crate::room::{Direction, RoomGroup, RoomKind, RoomTemplate, TemplateId};

/// Source of room templates
pub trait RoomPool {
    fn template(&self, id: TemplateId) -> &RoomTemplate;

    fn entrances(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId>;
    fn boss_rooms(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId>;
    fn thunderbird_rooms(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId>;
    fn item_rooms(&self, group: RoomGroup, orientation: Direction, custom: bool) -> Vec<TemplateId>;
    fn normal_rooms(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId>;
    fn great_palace_rooms(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId>;

    fn lookup_by_name(&self, name: &str) -> Option<TemplateId>;

    fn vanilla_boss_room(&self, palace_number: u8) -> Option<TemplateId>;
    fn vanilla_item_room(&self, palace_number: u8) -> Option<TemplateId>;
    /// Filler rooms of the unmodified palace, in map order
    fn vanilla_palace_rooms(&self, palace_number: u8, custom: bool) -> Vec<TemplateId>;
}

/// In-memory template arena
#[derive(Debug, Clone, Default)]
pub struct RoomCatalog {
    templates: Vec<RoomTemplate>,
    by_name: HashMap<String, TemplateId>,
}

impl RoomCatalog {
    /// Build a catalog, rejecting duplicate names and links to missing rooms.
    pub fn new(templates: Vec<RoomTemplate>) -> Result<Self, CatalogError> {
        let mut by_name = HashMap::with_capacity(templates.len());
        for (i, template) in templates.iter().enumerate() {
            if by_name.insert(template.name.clone(), TemplateId(i)).is_some() {
                return Err(CatalogError::DuplicateName(template.name.clone()));
            }
        }
        for template in &templates {
            if let Some(target) = &template.linked_room
                && !by_name.contains_key(target)
            {
                return Err(CatalogError::DanglingLink {
                    room: template.name.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(Self { templates, by_name })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let templates: Vec<RoomTemplate> = serde_json::from_str(json)?;
        Self::new(templates)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> &[RoomTemplate] {
        &self.templates
    }

    fn select(&self, pred: impl Fn(&RoomTemplate) -> bool) -> Vec<TemplateId> {
        self.templates
            .iter()
            .enumerate()
            .filter(|(_, t)| pred(t))
            .map(|(i, _)| TemplateId(i))
            .collect()
    }

    fn by_kind(&self, kind: RoomKind, group: RoomGroup, custom: bool) -> Vec<TemplateId> {
        self.select(|t| t.kind == kind && t.group == group && t.custom == custom)
    }

    fn vanilla_for_palace(&self, kind: RoomKind, palace_number: u8) -> Option<TemplateId> {
        self.select(|t| {
            t.kind == kind && t.group == RoomGroup::Vanilla && t.palace_number == Some(palace_number)
        })
        .into_iter()
        .next()
    }
}

impl RoomPool for RoomCatalog {
    fn template(&self, id: TemplateId) -> &RoomTemplate {
        &self.templates[id.0]
    }

    fn entrances(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId> {
        self.by_kind(RoomKind::Entrance, group, custom)
    }

    fn boss_rooms(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId> {
        self.by_kind(RoomKind::Boss, group, custom)
    }

    fn thunderbird_rooms(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId> {
        self.by_kind(RoomKind::Thunderbird, group, custom)
    }

    fn item_rooms(&self, group: RoomGroup, orientation: Direction, custom: bool) -> Vec<TemplateId> {
        self.select(|t| {
            t.kind == RoomKind::Item
                && t.group == group
                && t.custom == custom
                && t.orientation == Some(orientation)
        })
    }

    fn normal_rooms(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId> {
        self.by_kind(RoomKind::Normal, group, custom)
    }

    fn great_palace_rooms(&self, group: RoomGroup, custom: bool) -> Vec<TemplateId> {
        self.by_kind(RoomKind::GreatPalace, group, custom)
    }

    fn lookup_by_name(&self, name: &str) -> Option<TemplateId> {
        self.by_name.get(name).copied()
    }

    fn vanilla_boss_room(&self, palace_number: u8) -> Option<TemplateId> {
        self.vanilla_for_palace(RoomKind::Boss, palace_number)
    }

    fn vanilla_item_room(&self, palace_number: u8) -> Option<TemplateId> {
        self.vanilla_for_palace(RoomKind::Item, palace_number)
    }

    fn vanilla_palace_rooms(&self, palace_number: u8, custom: bool) -> Vec<TemplateId> {
        let kind = if palace_number == 7 {
            RoomKind::GreatPalace
        } else {
            RoomKind::Normal
        };
        self.select(|t| {
            t.kind == kind
                && t.group == RoomGroup::Vanilla
                && t.custom == custom
                && t.palace_number == Some(palace_number)
        })
    }
}
