//! Finds the Pokémon matching every selected filter.
//!
//! Each filter endpoint lists Pokémon in one of two shapes: types and
//! abilities nest each entry under `pokemon`, moves list them flat under
//! `learned_by_pokemon`. Responses are decoded into [`ResourceResponse`]
//! and the resulting lists are intersected, seeded by the first endpoint.

use std::collections::HashSet;

use futures::future::try_join_all;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use crate::cache::{Fetch, ResponseCache};
use crate::selection::Selection;
use crate::{ApiData, FindError};

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonSlot {
    pub pokemon: ApiData,
}

/// The response shapes that carry a Pokémon list. Variants are tried in
/// order, so a body with both fields reads as a roster.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResourceResponse {
    /// `/type/{id}` and `/ability/{id}`.
    Roster { pokemon: Vec<PokemonSlot> },
    /// `/move/{id}`.
    Learners { learned_by_pokemon: Vec<ApiData> },
}

impl ResourceResponse {
    /// Decode a response body, naming `url` if it matches no known shape.
    pub fn parse(url: &str, body: &Value) -> Result<Self, FindError> {
        ResourceResponse::deserialize(body).map_err(|e| {
            debug!("Unrecognized response from {}: {}", url, e);
            FindError::UnrecognizedShape {
                url: url.to_owned(),
            }
        })
    }

    pub fn into_pokemon(self) -> Vec<ApiData> {
        match self {
            ResourceResponse::Roster { pokemon } => {
                pokemon.into_iter().map(|slot| slot.pokemon).collect()
            }
            ResourceResponse::Learners { learned_by_pokemon } => learned_by_pokemon,
        }
    }
}

/// Entries of the first list that appear in every other list, in the first
/// list's order. Two entries match when both name and url are equal.
pub fn intersect(mut lists: Vec<Vec<ApiData>>) -> Vec<ApiData> {
    if lists.is_empty() {
        return Vec::new();
    }
    let mut result = lists.remove(0);
    for (index, list) in lists.iter().enumerate() {
        let members: HashSet<&ApiData> = list.iter().collect();
        result.retain(|p| members.contains(p));
        debug!("After filter {}: {} Pokémon remain", index + 1, result.len());
        if result.is_empty() {
            break;
        }
    }
    result
}

/// Fetch every selected endpoint through `cache` and intersect the results.
///
/// All endpoints are requested at once; the first failure aborts the whole
/// search. An empty selection is [`FindError::NoFilters`].
pub async fn find_pokemon<F: Fetch>(
    cache: &ResponseCache<F>,
    selection: &Selection,
) -> Result<Vec<ApiData>, FindError> {
    find_pokemon_at(cache, &selection.endpoints()).await
}

/// Same as [`find_pokemon`] for an explicit endpoint list.
pub async fn find_pokemon_at<F: Fetch>(
    cache: &ResponseCache<F>,
    endpoints: &[String],
) -> Result<Vec<ApiData>, FindError> {
    if endpoints.is_empty() {
        return Err(FindError::NoFilters);
    }

    let responses = try_join_all(endpoints.iter().map(|url| cache.get_data(url))).await?;

    let lists = endpoints
        .iter()
        .zip(responses)
        .map(|(url, body)| ResourceResponse::parse(url, &body).map(ResourceResponse::into_pokemon))
        .collect::<Result<Vec<_>, _>>()?;

    let found = intersect(lists);
    info!(
        "Found {} Pokémon matching {} filter(s)",
        found.len(),
        endpoints.len()
    );
    Ok(found)
}
