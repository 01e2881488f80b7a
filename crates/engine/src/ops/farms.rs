use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Action, Farm, FarmUpdate, NewFarm, Principal, ResultEngine, Role, farms,
    util::{normalize_optional_text, normalize_required_text, require_positive},
};

use super::{Engine, convert_all, find_required, with_tx};

impl Engine {
    /// Register a farm for a verified farmer.
    pub async fn create_farm(&self, principal: &Principal, cmd: NewFarm) -> ResultEngine<Farm> {
        principal.authorize(Action::CreateFarm)?;
        let now = Utc::now();
        let farm = Farm {
            id: Uuid::new_v4(),
            farmer_id: principal.id,
            name: normalize_required_text(&cmd.name, "name")?,
            description: normalize_optional_text(cmd.description),
            location: normalize_required_text(&cmd.location, "location")?,
            size_hectares: require_positive(cmd.size_hectares, "size_hectares")?,
            soil_type: normalize_optional_text(cmd.soil_type),
            irrigation_type: normalize_optional_text(cmd.irrigation_type),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        with_tx!(self, |db_tx| {
            farms::ActiveModel::from(&farm).insert(&db_tx).await?;
            tracing::info!(farm_id = %farm.id, farmer_id = %farm.farmer_id, "farm created");
            Ok(farm)
        })
    }

    /// Farmers see their own farms; everybody else sees active farms.
    pub async fn farms(&self, principal: &Principal) -> ResultEngine<Vec<Farm>> {
        with_tx!(self, |db_tx| {
            let query = farms::Entity::find().order_by_asc(farms::Column::CreatedAt);
            let query = if principal.role == Role::Farmer {
                query.filter(farms::Column::FarmerId.eq(principal.id.to_string()))
            } else {
                query.filter(farms::Column::IsActive.eq(true))
            };
            convert_all(query.all(&db_tx).await?)
        })
    }

    pub async fn farm(&self, principal: &Principal, farm_id: Uuid) -> ResultEngine<Farm> {
        with_tx!(self, |db_tx| {
            let model = find_required::<farms::Entity>(&db_tx, farm_id, "Farm not found").await?;
            let farm = Farm::try_from(model)?;
            principal.authorize(Action::ViewFarm {
                owner: farm.farmer_id,
            })?;
            Ok(farm)
        })
    }

    /// Merge the supplied fields into an owned farm.
    pub async fn update_farm(
        &self,
        principal: &Principal,
        farm_id: Uuid,
        update: FarmUpdate,
    ) -> ResultEngine<Farm> {
        with_tx!(self, |db_tx| {
            let model = find_required::<farms::Entity>(&db_tx, farm_id, "Farm not found").await?;
            let mut farm = Farm::try_from(model)?;
            principal.authorize(Action::UpdateFarm {
                owner: farm.farmer_id,
            })?;

            if let Some(name) = update.name {
                farm.name = normalize_required_text(&name, "name")?;
            }
            if update.description.is_some() {
                farm.description = normalize_optional_text(update.description);
            }
            if let Some(location) = update.location {
                farm.location = normalize_required_text(&location, "location")?;
            }
            if let Some(size) = update.size_hectares {
                farm.size_hectares = require_positive(size, "size_hectares")?;
            }
            if update.soil_type.is_some() {
                farm.soil_type = normalize_optional_text(update.soil_type);
            }
            if update.irrigation_type.is_some() {
                farm.irrigation_type = normalize_optional_text(update.irrigation_type);
            }
            if let Some(is_active) = update.is_active {
                farm.is_active = is_active;
            }
            farm.updated_at = Utc::now();

            farms::ActiveModel::from(&farm).update(&db_tx).await?;
            Ok(farm)
        })
    }
}
