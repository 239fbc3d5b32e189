use std::rc::Rc;

use gloo_timers::callback::Timeout;
use pokemon_finder::config::DEBOUNCE_MS;
use pokemon_finder::{filter_candidates, ApiData, Category, ReferenceData, Typeahead};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Holds the state and callbacks for one typeahead input.
#[derive(Clone)]
pub struct TypeaheadHandle {
    /// The current text content of the input field.
    pub text: String,
    /// Suggestions for the last emitted search term.
    pub suggestions: Rc<Vec<Rc<ApiData>>>,
    /// Whether the suggestion popup is showing.
    pub open: bool,
    /// Callback for the input's `oninput` event. Updates the text and (re)arms the debounce.
    pub on_input: Callback<InputEvent>,
    pub on_focus: Callback<FocusEvent>,
    pub on_click: Callback<MouseEvent>,
    pub on_blur: Callback<FocusEvent>,
    /// Picks a suggestion: forwards it, clears the text and closes the popup.
    pub on_select: Callback<Rc<ApiData>>,
}

/// Replace any pending timer with a new one that runs `f` after `delay_ms`.
fn debounce(timer_handle: &UseStateHandle<Option<Timeout>>, delay_ms: u32, f: impl FnOnce() + 'static) {
    // Dropping the old Timeout cancels it
    timer_handle.set(None);

    let timer_handle_clone = timer_handle.clone();
    let handle = Timeout::new(delay_ms, move || {
        f();
        timer_handle_clone.set(None);
    });
    timer_handle.set(Some(handle));
}

/// Custom hook wiring a [`Typeahead`] state machine to an input element.
#[hook]
pub fn use_typeahead(
    reference: Rc<ReferenceData>,
    category: Category,
    on_pick: Callback<Rc<ApiData>>,
) -> TypeaheadHandle {
    let machine = use_mut_ref(Typeahead::new);
    let text = use_state(String::new);
    let suggestions = use_state(|| Rc::new(Vec::<Rc<ApiData>>::new()));
    let open = use_state(|| false);
    let debounce_timer = use_state(|| None::<Timeout>);

    // Recompute suggestions when the machine emits a term.
    let show = {
        let reference = reference.clone();
        let suggestions = suggestions.clone();
        let open = open.clone();
        Callback::from(move |term: Option<String>| {
            if let Some(term) = term {
                let found = filter_candidates(reference.list(category), &term);
                suggestions.set(Rc::new(found));
                open.set(true);
            }
        })
    };

    let on_input = {
        let machine = machine.clone();
        let text = text.clone();
        let show = show.clone();
        let debounce_timer = debounce_timer.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            machine.borrow_mut().input(&value);
            text.set(value);

            let machine = machine.clone();
            let show = show.clone();
            debounce(&debounce_timer, DEBOUNCE_MS, move || {
                let term = machine.borrow_mut().debounce_elapsed();
                show.emit(term);
            });
        })
    };

    let on_focus = {
        let machine = machine.clone();
        let text = text.clone();
        let show = show.clone();
        Callback::from(move |_: FocusEvent| {
            let term = machine.borrow_mut().focus(&text);
            show.emit(term);
        })
    };

    let on_click = {
        let machine = machine.clone();
        let text = text.clone();
        let show = show.clone();
        Callback::from(move |_: MouseEvent| {
            let term = machine.borrow_mut().click(&text);
            show.emit(term);
        })
    };

    let on_blur = {
        let machine = machine.clone();
        let open = open.clone();
        let debounce_timer = debounce_timer.clone();
        Callback::from(move |_: FocusEvent| {
            machine.borrow_mut().dismiss();
            debounce_timer.set(None);
            open.set(false);
        })
    };

    let on_select = {
        let machine = machine.clone();
        let text = text.clone();
        let open = open.clone();
        let debounce_timer = debounce_timer.clone();
        Callback::from(move |item: Rc<ApiData>| {
            machine.borrow_mut().select();
            debounce_timer.set(None);
            text.set(String::new());
            open.set(false);
            on_pick.emit(item);
        })
    };

    TypeaheadHandle {
        text: (*text).clone(),
        suggestions: (*suggestions).clone(),
        open: *open,
        on_input,
        on_focus,
        on_click,
        on_blur,
        on_select,
    }
}
