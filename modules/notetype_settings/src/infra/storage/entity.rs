//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Notetypes table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "notetypes")]
pub struct Model {
    /// Host notetype identifier
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Unique notetype name
    #[sea_orm(unique)]
    pub name: String,

    /// Card templates as JSON (`[{name, front, back}]`)
    pub templates: Json,

    /// Note fields as JSON (`[{name, ord}]`)
    pub fields: Json,

    /// Shared stylesheet
    #[sea_orm(column_type = "Text")]
    pub css: String,

    /// Last modification timestamp
    pub modified: DateTimeUtc,

    /// Update sequence number
    pub usn: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Notes using the notetype
    #[sea_orm(has_many = "note::Entity")]
    Notes,
}

impl Related<note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Notes module; only the notetype link is tracked
pub mod note {
    use sea_orm::entity::prelude::*;

    /// Notes table entity
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "notes")]
    pub struct Model {
        /// Note identifier
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,

        /// Notetype the note uses
        pub notetype_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// Foreign key to notetypes
        #[sea_orm(
            belongs_to = "super::Entity",
            from = "Column::NotetypeId",
            to = "super::Column::Id"
        )]
        Notetype,
    }

    impl Related<super::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Notetype.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
