//! Yew view components for the Pokémon finder UI.
//!
//! Apart from [`TypeaheadInput`], which owns its suggestion state through
//! `use_typeahead`, these render purely from props.

use std::rc::Rc;

use pokemon_finder::{display_name, ApiData, Category, ReferenceData};
use yew::prelude::*;

use crate::hooks::use_typeahead;

/// Reference data handle compared by pointer, so props stay cheap to diff.
#[derive(Clone)]
pub struct SharedReference(pub Rc<ReferenceData>);

impl PartialEq for SharedReference {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Text input with a suggestion popup over one reference category.
#[derive(Properties, PartialEq)]
pub struct TypeaheadInputProps {
    pub category: Category,
    pub reference: SharedReference,
    pub on_pick: Callback<Rc<ApiData>>,
    #[prop_or_default]
    pub hint: Option<AttrValue>,
}

#[function_component(TypeaheadInput)]
pub fn typeahead_input(props: &TypeaheadInputProps) -> Html {
    let handle = use_typeahead(props.reference.0.clone(), props.category, props.on_pick.clone());
    let id = format!("{}-search", props.category.resource());

    html! {
        <div class="form-group typeahead">
            <label for={id.clone()}>{ format!("{}:", props.category.label()) }</label>
            <input
                type="text"
                id={id}
                autocomplete="off"
                value={handle.text.clone()}
                placeholder={props.hint.clone()}
                oninput={handle.on_input.clone()}
                onfocus={handle.on_focus.clone()}
                onclick={handle.on_click.clone()}
                onblur={handle.on_blur.clone()}
            />
            if handle.open && !handle.suggestions.is_empty() {
                <ul class="typeahead-popup">
                    { handle.suggestions.iter().map(|item| {
                        let on_select = handle.on_select.clone();
                        let picked = item.clone();
                        // mousedown fires before the input's blur closes the popup
                        let onmousedown = Callback::from(move |e: MouseEvent| {
                            e.prevent_default();
                            on_select.emit(picked.clone());
                        });
                        html! {
                            <li class="typeahead-item" key={item.url.clone()} {onmousedown}>
                                { display_name(item) }
                            </li>
                        }
                    }).collect::<Html>() }
                </ul>
            }
        </div>
    }
}

/// The picks of one category as removable chips.
#[derive(Properties, PartialEq)]
pub struct PickChipsProps {
    pub title: AttrValue,
    pub items: Vec<Rc<ApiData>>,
    #[prop_or_default]
    pub capacity: Option<usize>,
    pub on_remove: Callback<Rc<ApiData>>,
}

#[function_component(PickChips)]
pub fn pick_chips(props: &PickChipsProps) -> Html {
    let heading = match props.capacity {
        Some(max) => format!("{} ({}/{})", props.title, props.items.len(), max),
        None => format!("{} ({})", props.title, props.items.len()),
    };

    html! {
        <div class="picks">
            <span class="picks-title">{ heading }</span>
            { props.items.iter().map(|item| {
                let on_remove = props.on_remove.clone();
                let removed = item.clone();
                html! {
                    <span class="chip" key={item.url.clone()}>
                        { display_name(item) }
                        <button class="chip-remove"
                            title="Remove"
                            onclick={Callback::from(move |_| on_remove.emit(removed.clone()))}
                        >
                            { "×" }
                        </button>
                    </span>
                }
            }).collect::<Html>() }
        </div>
    }
}

/// Renders the table of Pokémon matching every filter.
pub fn render_results(found: &[ApiData]) -> Html {
    // Early return for empty results
    if found.is_empty() {
        return html! {
            <div class="results">
                <p class="no-results-message">{ "No Pokémon match all selected filters" }</p>
            </div>
        };
    }

    html! {
        <div class="results">
            <h3>{ format!("{} matching Pokémon", found.len()) }</h3>
            <div class="result-table-container">
                <table class="result-table">
                    <thead>
                        <tr>
                            <th>{ "#" }</th>
                            <th>{ "Name" }</th>
                            <th>{ "Details" }</th>
                        </tr>
                    </thead>
                    <tbody>
                        { found.iter().enumerate().map(|(idx, p)| render_result_row(p, idx)).collect::<Html>() }
                    </tbody>
                </table>
            </div>
        </div>
    }
}

fn render_result_row(pokemon: &ApiData, idx: usize) -> Html {
    html! {
        <tr key={pokemon.url.clone()}>
            <td>{ idx + 1 }</td>
            <td>{ display_name(pokemon) }</td>
            <td><a href={pokemon.url.clone()} target="_blank" rel="noopener">{ pokemon.url.clone() }</a></td>
        </tr>
    }
}

/// Cache entry count and a button to empty it.
#[derive(Properties, PartialEq)]
pub struct CacheInfoProps {
    pub entries: usize,
    pub on_clear: Callback<()>,
}

#[function_component(CacheInfo)]
pub fn cache_info(props: &CacheInfoProps) -> Html {
    let on_clear = props.on_clear.reform(|_: MouseEvent| ());
    html! {
        <div class="cache-stats">
            <div class="cache-status compact">
                { format!("Cached responses: {}", props.entries) }
            </div>
            <button class="btn-secondary small" onclick={on_clear} disabled={props.entries == 0}>
                { "Clear Cache" }
            </button>
        </div>
    }
}
