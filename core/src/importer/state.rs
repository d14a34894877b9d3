/// Tags the importer reacts to; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    RedSide,
    AirDomain,
    Entity,
    Name,
    Model,
    Position,
    Other,
}

/// Entity child whose character data is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityField {
    Name,
    Model,
    Position,
}

/// Raw text gathered for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityDraft {
    pub id: Option<String>,
    pub name: String,
    pub model: String,
    pub position: String,
}

impl EntityDraft {
    pub fn new(id: Option<String>) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    fn append(&mut self, field: EntityField, text: &str) {
        match field {
            EntityField::Name => self.name.push_str(text),
            EntityField::Model => self.model.push_str(text),
            EntityField::Position => self.position.push_str(text),
        }
    }
}

/// Position of the reader within RedSide → AirDomain → Entity.
///
/// Each variant implies its ancestors, so an entity can only be open
/// inside an air domain of the red side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImportState {
    #[default]
    Outside,
    InRedSide,
    InAirDomain,
    InEntity {
        draft: EntityDraft,
        field: Option<EntityField>,
    },
}

impl ImportState {
    /// Transition on an opening tag. `id` is the entity ID attribute, if any.
    pub fn open(self, tag: Tag, id: Option<String>) -> ImportState {
        match (self, tag) {
            (ImportState::Outside, Tag::RedSide) => ImportState::InRedSide,
            (ImportState::InRedSide, Tag::AirDomain) => ImportState::InAirDomain,
            (ImportState::InAirDomain, Tag::Entity) => ImportState::InEntity {
                draft: EntityDraft::new(id),
                field: None,
            },
            (ImportState::InEntity { draft, .. }, tag) => ImportState::InEntity {
                draft,
                field: match tag {
                    Tag::Name => Some(EntityField::Name),
                    Tag::Model => Some(EntityField::Model),
                    Tag::Position => Some(EntityField::Position),
                    _ => None,
                },
            },
            (state, _) => state,
        }
    }

    /// Transition on a closing tag; closing an entity hands back its draft.
    pub fn close(self, tag: Tag) -> (ImportState, Option<EntityDraft>) {
        match (self, tag) {
            (ImportState::InEntity { draft, .. }, Tag::Entity) => {
                (ImportState::InAirDomain, Some(draft))
            }
            (ImportState::InEntity { draft, .. }, _) => {
                (ImportState::InEntity { draft, field: None }, None)
            }
            (ImportState::InAirDomain, Tag::AirDomain) => (ImportState::InRedSide, None),
            (ImportState::InRedSide, Tag::RedSide) => (ImportState::Outside, None),
            (state, _) => (state, None),
        }
    }

    /// Character data goes to the selected entity field, or nowhere.
    pub fn text(&mut self, text: &str) {
        if let ImportState::InEntity {
            draft,
            field: Some(field),
        } = self
        {
            draft.append(*field, text);
        }
    }
}
