//! Main module for the Pokémon finder application using Yew.
//! Wires selection state, the response cache and the search into the UI.

use std::rc::Rc;

use log::{debug, error, warn};
use pokemon_finder::{
    config::{MAX_ABILITIES, MAX_TYPES},
    find_pokemon, logger, ApiData, Category, HttpFetcher, ReferenceData, ResponseCache,
    Selection,
};
use yew::prelude::*;

mod components;
mod hooks;

use components::{render_results, CacheInfo, PickChips, SharedReference, TypeaheadInput};

type Cache = ResponseCache<HttpFetcher>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Callback that applies `update` to a copy of the selection and stores it.
fn selection_updater(
    selection: &UseStateHandle<Selection>,
    update: fn(&mut Selection, Rc<ApiData>) -> bool,
) -> Callback<Rc<ApiData>> {
    let selection = selection.clone();
    Callback::from(move |item: Rc<ApiData>| {
        let mut next = (*selection).clone();
        if update(&mut next, item) {
            selection.set(next);
        }
    })
}

/// Helper to bump the cache version and trigger a re-render
fn update_cache_version(cache_version: &UseStateHandle<usize>) {
    cache_version.set(cache_version.wrapping_add(1));
}

/// Run one search, publishing its outcome unless a newer search started meanwhile.
fn run_search(
    cache: Rc<Cache>,
    selection: Selection,
    current_token: u32,
    token_ref: Rc<std::cell::RefCell<u32>>,
    results: UseStateHandle<Option<Rc<Vec<ApiData>>>>,
    error_message: UseStateHandle<Option<String>>,
    is_searching: UseStateHandle<bool>,
    cache_version: UseStateHandle<usize>,
) {
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = find_pokemon(&*cache, &selection).await;

        // Check if we were superseded
        if *token_ref.borrow() != current_token {
            debug!("Discarding results of superseded search {}", current_token);
            return;
        }

        match outcome {
            Ok(found) => {
                results.set(Some(Rc::new(found)));
                error_message.set(None);
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                results.set(None);
                error_message.set(Some(e.to_string()));
            }
        }
        is_searching.set(false);
        update_cache_version(&cache_version);
    });
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    let reference = use_memo((), |_| {
        ReferenceData::load().unwrap_or_else(|e| {
            error!("{}", e);
            ReferenceData::default()
        })
    });
    let cache = use_memo((), |_| Cache::new(HttpFetcher::new()));

    let selection = use_state(Selection::new);
    let results = use_state(|| None::<Rc<Vec<ApiData>>>);
    let error_message = use_state(|| None::<String>);
    let is_searching = use_state(|| false);
    // Cache version state triggers UI re-render when the cache changes
    let cache_version = use_state(|| 0usize);
    // Search generation; results of older generations are dropped
    let search_token = use_mut_ref(|| 0u32);

    let shared_reference = SharedReference(reference.clone());

    let add_type = selection_updater(&selection, Selection::add_type);
    let add_ability = selection_updater(&selection, Selection::add_ability);
    let add_move = selection_updater(&selection, Selection::add_move);
    let remove_type = selection_updater(&selection, |s, item| s.remove_type(&item));
    let remove_ability = selection_updater(&selection, |s, item| s.remove_ability(&item));
    let remove_move = selection_updater(&selection, |s, item| s.remove_move(&item));

    let find = {
        let cache = cache.clone();
        let selection = selection.clone();
        let search_token = search_token.clone();
        let results = results.clone();
        let error_message = error_message.clone();
        let is_searching = is_searching.clone();
        let cache_version = cache_version.clone();
        Callback::from(move |_: MouseEvent| {
            let current_token = {
                let mut token = search_token.borrow_mut();
                *token = token.wrapping_add(1);
                *token
            };
            is_searching.set(true);
            error_message.set(None);
            run_search(
                cache.clone(),
                (*selection).clone(),
                current_token,
                search_token.clone(),
                results.clone(),
                error_message.clone(),
                is_searching.clone(),
                cache_version.clone(),
            );
        })
    };

    let clear_selection = {
        let selection = selection.clone();
        let results = results.clone();
        let error_message = error_message.clone();
        let is_searching = is_searching.clone();
        let search_token = search_token.clone();
        Callback::from(move |_: MouseEvent| {
            // Bumping the token abandons any running search
            let mut token = search_token.borrow_mut();
            *token = token.wrapping_add(1);
            drop(token);
            selection.set(Selection::new());
            results.set(None);
            error_message.set(None);
            is_searching.set(false);
        })
    };

    let clear_cache = {
        let cache = cache.clone();
        let cache_version = cache_version.clone();
        Callback::from(move |_: ()| {
            cache.clear();
            update_cache_version(&cache_version);
        })
    };

    html! {
        <div class="container">
            <h1>{ "Pokémon Finder" }</h1>

            <div class="controls">
                <div class="form-row">
                    <TypeaheadInput
                        category={Category::Type}
                        reference={shared_reference.clone()}
                        on_pick={add_type}
                        hint={AttrValue::from("e.g. fire")}
                    />
                    <TypeaheadInput
                        category={Category::Ability}
                        reference={shared_reference.clone()}
                        on_pick={add_ability}
                        hint={AttrValue::from("e.g. flash fire")}
                    />
                    <TypeaheadInput
                        category={Category::Move}
                        reference={shared_reference}
                        on_pick={add_move}
                        hint={AttrValue::from("e.g. thunder punch")}
                    />
                </div>

                <PickChips title="Types" items={selection.types().to_vec()} capacity={Some(MAX_TYPES)} on_remove={remove_type} />
                <PickChips title="Abilities" items={selection.abilities().to_vec()} capacity={Some(MAX_ABILITIES)} on_remove={remove_ability} />
                <PickChips title="Moves" items={selection.moves().to_vec()} on_remove={remove_move} />

                <div class="button-row">
                    <button class="btn-primary"
                        onclick={find}
                        disabled={*is_searching || selection.is_empty()}
                    >
                        { if *is_searching { "Searching…" } else { "Find Pokémon" } }
                    </button>
                    <button class="btn-secondary" onclick={clear_selection}>
                        { "Clear Filters" }
                    </button>
                </div>

                <CacheInfo entries={cache.len()} on_clear={clear_cache} />

                if let Some(err) = &*error_message {
                    <div class="current-error compact">
                        { err }
                    </div>
                }
            </div>

            // Results section
            <div class="results-area">
                if let Some(found) = &*results {
                    { render_results(found) }
                } else if !*is_searching {
                    <div class="no-results-message">
                        <p>{ "Pick types, abilities or moves, then search." }</p>
                    </div>
                }
            </div>
        </div>
    }
}

/// Entry point: installs logging and renders the App component.
fn main() {
    // Set the panic hook to log detailed errors to the console
    console_error_panic_hook::set_once();
    if let Err(e) = logger::init() {
        web_sys::console::warn_1(&format!("Logger already initialised: {}", e).into());
    }
    yew::Renderer::<App>::new().render();
}
