//! JavaScript surface for pages that want the finder without the Yew UI.
//!
//! ```js
//! const finder = new PokemonFinder();
//! const fire = finder.search("type", "fire")[0];
//! const matches = await finder.find([fire], [], []);
//! ```

use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::cache::ResponseCache;
use crate::finder::find_pokemon;
use crate::http::HttpFetcher;
use crate::reference::{Category, ReferenceData};
use crate::search::filter_candidates;
use crate::selection::Selection;
use crate::ApiData;

#[wasm_bindgen]
pub struct PokemonFinder {
    reference: Rc<ReferenceData>,
    cache: Rc<ResponseCache<HttpFetcher>>,
}

#[wasm_bindgen]
impl PokemonFinder {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PokemonFinder, JsValue> {
        let reference = ReferenceData::load().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(PokemonFinder {
            reference: Rc::new(reference),
            cache: Rc::new(ResponseCache::new(HttpFetcher::new())),
        })
    }

    /// Typeahead suggestions for `category` ("type", "ability", "move" or
    /// "generation") as an array of `{name, url}`.
    pub fn search(&self, category: &str, term: &str) -> Result<JsValue, JsValue> {
        let category: Category = category.parse().map_err(|e: String| JsValue::from_str(&e))?;
        let found: Vec<ApiData> = filter_candidates(self.reference.list(category), term)
            .into_iter()
            .map(|item| (*item).clone())
            .collect();
        serde_wasm_bindgen::to_value(&found).map_err(JsValue::from)
    }

    /// Resolves to the Pokémon matching every given type, ability and move.
    /// The usual limits apply: the last two types and last three abilities.
    pub fn find(&self, types: JsValue, abilities: JsValue, moves: JsValue) -> Promise {
        let cache = self.cache.clone();
        future_to_promise(async move {
            let mut selection = Selection::new();
            for item in from_js(types)? {
                selection.add_type(item);
            }
            for item in from_js(abilities)? {
                selection.add_ability(item);
            }
            for item in from_js(moves)? {
                selection.add_move(item);
            }

            let found = find_pokemon(&*cache, &selection)
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            serde_wasm_bindgen::to_value(&found).map_err(JsValue::from)
        })
    }

    #[wasm_bindgen(js_name = cachedCount)]
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    #[wasm_bindgen(js_name = clearCache)]
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn from_js(value: JsValue) -> Result<Vec<Rc<ApiData>>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }
    let items: Vec<ApiData> = serde_wasm_bindgen::from_value(value)?;
    Ok(items.into_iter().map(Rc::new).collect())
}
