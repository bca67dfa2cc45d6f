#![cfg(target_arch = "wasm32")]

use leptos::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::catalog::{self, SLOT_PRESETS};
use crate::gateway::Gateway;
use crate::prediction::{PredictionReport, format_prediction};
use crate::report::{JSON_REPORT_FILENAME, XLSX_REPORT_FILENAME, json_report, workbook_bytes};
use crate::session::{Screen, Session};

#[derive(Clone, Copy, PartialEq, Eq)]
enum BannerKind {
    Error,
    Info,
}

#[derive(Clone, PartialEq, Eq)]
struct Banner {
    message: String,
    kind: BannerKind,
}

impl Banner {
    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: BannerKind::Error,
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: BannerKind::Info,
        }
    }
}

fn iso_timestamp() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}

/// Hands a finished byte buffer to the browser as a file download via a
/// temporary object URL and a synthetic anchor click.
fn trigger_download(filename: &str, mime: &str, bytes: Vec<u8>) -> Result<(), String> {
    let array = js_sys::Uint8Array::from(bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let mut options = BlobPropertyBag::new();
    options.type_(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|_| "failed to create blob".to_string())?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| "failed to create download URL".to_string())?;

    let document = window()
        .document()
        .ok_or_else(|| "document unavailable".to_string())?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| "failed to create anchor".to_string())?
        .dyn_into()
        .map_err(|_| "anchor cast failed".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| "document body unavailable".to_string())?;
    let _ = body.append_child(&anchor);
    anchor.click();
    anchor.remove();
    Url::revoke_object_url(&url).ok();

    Ok(())
}

#[component]
fn StartScreen(on_new: Callback<()>, on_recipe: Callback<()>) -> impl IntoView {
    view! {
        <section class="panel start-panel">
            <h2 class="panel-title">"Compound Prediction Tool"</h2>
            <p class="panel-subtitle">"Choose an option to begin:"</p>
            <div class="start-actions">
                <button class="btn btn-primary" type="button" on:click=move |_| on_new.call(())>
                    "Create New Composition"
                </button>
                <button class="btn btn-secondary" type="button" on:click=move |_| on_recipe.call(())>
                    "Modify Existing Recipe"
                </button>
            </div>
        </section>
    }
}

#[component]
fn RecipeScreen(
    gateway: Gateway,
    busy: ReadSignal<bool>,
    on_back: Callback<()>,
    on_proceed: Callback<String>,
) -> impl IntoView {
    let (selected, set_selected) = create_signal(String::new());

    let recipes = create_resource(
        || (),
        move |_| {
            let gateway = gateway.clone();
            async move { gateway.list_recipes().await.map_err(|error| error.to_string()) }
        },
    );

    let proceed_disabled = move || busy.get() || selected.get().is_empty();

    view! {
        <section class="panel">
            <h2 class="panel-title">"Select Existing Recipe"</h2>
            {move || match recipes.get() {
                Some(Ok(names)) => {
                    view! {
                        <select
                            class="field"
                            on:change=move |event| set_selected.set(event_target_value(&event))
                        >
                            <option value="" selected=move || selected.get().is_empty()>
                                "-- Select a Recipe --"
                            </option>
                            {names
                                .into_iter()
                                .map(|name| {
                                    let value = name.clone();
                                    let label = name.clone();
                                    view! {
                                        <option value=value selected=move || selected.get() == name>
                                            {label}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    }
                    .into_view()
                }
                Some(Err(message)) => view! { <p class="error-body">{message}</p> }.into_view(),
                None => view! { <p class="muted">"Loading recipes..."</p> }.into_view(),
            }}
            <div class="button-row">
                <button class="btn" type="button" on:click=move |_| on_back.call(())>
                    "Back"
                </button>
                <button
                    class="btn btn-primary"
                    type="button"
                    disabled=proceed_disabled
                    on:click=move |_| on_proceed.call(selected.get())
                >
                    "Proceed"
                </button>
            </div>
        </section>
    }
}

#[component]
fn MaterialSelectionScreen(
    session: ReadSignal<Session>,
    on_count: Callback<usize>,
    on_slot: Callback<(usize, String)>,
    on_back: Callback<()>,
    on_proceed: Callback<()>,
) -> impl IntoView {
    let (custom_count, set_custom_count) = create_signal(String::new());

    let choose_preset = move |count: usize| {
        set_custom_count.set(String::new());
        on_count.call(count);
    };

    let custom_changed = move |event: web_sys::Event| {
        let value = event_target_value(&event);
        set_custom_count.set(value.clone());
        if let Ok(count) = value.trim().parse::<usize>() {
            if count > 0 {
                on_count.call(count);
            }
        }
    };

    view! {
        <section class="panel">
            <h2 class="panel-title">"Select Number of Raw Materials"</h2>
            <div class="preset-row">
                {SLOT_PRESETS
                    .into_iter()
                    .map(|count| {
                        view! {
                            <button
                                class=move || {
                                    if session.get().slots().len() == count {
                                        "mode-btn active".to_string()
                                    } else {
                                        "mode-btn".to_string()
                                    }
                                }
                                type="button"
                                on:click=move |_| choose_preset(count)
                            >
                                {format!("{count} Materials")}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <input
                class="field"
                type="number"
                min="1"
                max=catalog::max_slots().to_string()
                placeholder="Or enter custom number of materials"
                prop:value=move || custom_count.get()
                on:input=custom_changed
            />
            <Show when=move || !session.get().slots().is_empty()>
                <div class="slot-list">
                    {move || {
                        let current = session.get();
                        let slots = current.slots().to_vec();
                        slots
                            .iter()
                            .enumerate()
                            .map(|(index, selection)| {
                                let options = catalog::available_materials(&slots, index);
                                let picked = selection.clone().unwrap_or_default();
                                let picked_for_select = picked.clone();
                                view! {
                                    <select
                                        class="field"
                                        on:change=move |event| {
                                            on_slot.call((index, event_target_value(&event)))
                                        }
                                    >
                                        <option value="" selected=picked_for_select.is_empty()>
                                            {format!("Select Material {}", index + 1)}
                                        </option>
                                        {options
                                            .into_iter()
                                            .map(|material| {
                                                view! {
                                                    <option
                                                        value=material
                                                        selected=picked == material
                                                    >
                                                        {material}
                                                    </option>
                                                }
                                            })
                                            .collect_view()}
                                    </select>
                                }
                            })
                            .collect_view()
                    }}
                </div>
            </Show>
            <div class="button-row">
                <button class="btn" type="button" on:click=move |_| on_back.call(())>
                    "Back"
                </button>
                <button
                    class="btn btn-primary"
                    type="button"
                    disabled=move || session.get().slots().is_empty()
                    on:click=move |_| on_proceed.call(())
                >
                    "Proceed to Composition"
                </button>
            </div>
        </section>
    }
}

#[component]
fn CompositionScreen(
    session: ReadSignal<Session>,
    busy: ReadSignal<bool>,
    on_amount: Callback<(usize, String)>,
    on_back: Callback<()>,
    on_predict: Callback<()>,
) -> impl IntoView {
    let heading = move || {
        let current = session.get();
        match (current.came_from_recipe(), current.selected_recipe()) {
            (true, Some(name)) => format!("Modify Recipe: {name}"),
            _ => "Enter Material Compositions".to_string(),
        }
    };

    view! {
        <section class="panel">
            <h2 class="panel-title">{heading}</h2>
            <p class="muted">
                {move || format!("Total: {:.2} grams", session.get().draft().running_total())}
            </p>
            <div class="composition-list">
                {move || {
                    session
                        .get()
                        .draft()
                        .entries
                        .iter()
                        .enumerate()
                        .map(|(index, entry)| {
                            let amount = entry.amount.clone();
                            view! {
                                <div class="composition-row">
                                    <span class="material-name">{entry.material.clone()}</span>
                                    <input
                                        class="field amount-field"
                                        type="number"
                                        min="0"
                                        step="0.1"
                                        placeholder="Grams"
                                        prop:value=amount
                                        on:input=move |event| {
                                            on_amount.call((index, event_target_value(&event)))
                                        }
                                    />
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <div class="button-row">
                <button class="btn" type="button" on:click=move |_| on_back.call(())>
                    "Back"
                </button>
                <button
                    class="btn btn-primary"
                    type="button"
                    disabled=move || busy.get()
                    on:click=move |_| on_predict.call(())
                >
                    "Predict Compound Result"
                </button>
            </div>
        </section>
    }
}

fn property_card(label: &str, value: String) -> impl IntoView {
    view! {
        <div class="property-card">
            <span class="property-label">{label.to_string()}</span>
            <div class="property-value">{value}</div>
        </div>
    }
}

#[component]
fn ResultsScreen(
    session: ReadSignal<Session>,
    on_back: Callback<()>,
    on_reset: Callback<()>,
    on_save_json: Callback<()>,
    on_save_xlsx: Callback<()>,
) -> impl IntoView {
    let report = move || session.get().report().cloned();
    let composition = move || session.get().submitted().cloned().unwrap_or_default();

    view! {
        <section class="panel results-panel">
            <h2 class="panel-title">"Prediction Results"</h2>
            {move || {
                report()
                    .map(|report: PredictionReport| {
                        let composition = composition();
                        let total = crate::composition::total_weight(&composition);
                        // Show children are 'static closures, so each block
                        // below owns the slice of the report it renders.
                        let test_rows = report.test_results.clone();
                        let has_test_rows = !test_rows.is_empty();
                        let impact_list = report.material_impacts.clone();
                        let has_impacts = !impact_list.is_empty();

                        view! {
                            <div class="results-body">
                                <div class="results-card">
                                    <h3 class="results-heading">"Material Composition"</h3>
                                    {composition
                                        .iter()
                                        .map(|entry| {
                                            view! {
                                                <div class="recap-row">
                                                    <span>{entry.material.clone()}</span>
                                                    <span class="recap-amount">
                                                        {format!("{} g", entry.composition)}
                                                    </span>
                                                </div>
                                            }
                                        })
                                        .collect_view()}
                                    <div class="recap-row recap-total">
                                        <span>"Total Weight"</span>
                                        <span class="recap-amount">{format!("{total:.2} g")}</span>
                                    </div>
                                </div>

                                <div class="results-card">
                                    <h3 class="results-heading">"Prediction Confidence"</h3>
                                    <div class="confidence-track">
                                        <div
                                            class="confidence-fill"
                                            style=format!("width: {:.1}%;", report.confidence_score)
                                        ></div>
                                    </div>
                                    <span class="confidence-label">
                                        {format!("{:.1}%", report.confidence_score)}
                                    </span>
                                </div>

                                <div class="results-card">
                                    <h3 class="results-heading">"Predicted Properties"</h3>
                                    <div class="property-grid">
                                        {property_card(
                                            "Tensile Strength",
                                            format!("{:.2} MPa", report.tensile_strength),
                                        )}
                                        {property_card(
                                            "Elongation at Break",
                                            format!("{:.2}%", report.elongation),
                                        )}
                                        {property_card(
                                            "Hardness",
                                            format!("{:.2} Shore A", report.hardness),
                                        )}
                                        {property_card(
                                            "Abrasion Resistance",
                                            format!("{:.2} mm3", report.abrasion_resistance),
                                        )}
                                        {property_card(
                                            "Tear Strength",
                                            format!("{:.2} kN/m", report.tear_strength),
                                        )}
                                        {property_card(
                                            "Density",
                                            format!("{:.3} g/cm3", report.density),
                                        )}
                                        {property_card(
                                            "Cure Time",
                                            format!("{:.1} min", report.cure_time),
                                        )}
                                    </div>
                                </div>

                                <div class="results-card">
                                    <h3 class="results-heading">"Recommended Uses"</h3>
                                    <div class="use-chips">
                                        {report
                                            .recommended_uses
                                            .iter()
                                            .map(|use_case| {
                                                view! { <span class="use-chip">{use_case.clone()}</span> }
                                            })
                                            .collect_view()}
                                    </div>
                                </div>

                                <Show when=move || has_test_rows>
                                    <div class="results-card">
                                        <h3 class="results-heading">"Test Results"</h3>
                                        <table class="results-table">
                                            <thead>
                                                <tr>
                                                    <th>"Parameter"</th>
                                                    <th>"Value"</th>
                                                </tr>
                                            </thead>
                                            <tbody>
                                                {test_rows
                                                    .iter()
                                                    .map(|row| {
                                                        let value = row
                                                            .value
                                                            .map(|number| format!("{number:.4}"))
                                                            .unwrap_or_else(|| "N/A".to_string());
                                                        view! {
                                                            <tr>
                                                                <td>{row.name.clone()}</td>
                                                                <td>{value}</td>
                                                            </tr>
                                                        }
                                                    })
                                                    .collect_view()}
                                            </tbody>
                                        </table>
                                    </div>
                                </Show>

                                <Show when=move || has_impacts>
                                    <div class="results-card">
                                        <h3 class="results-heading">"Material Impacts"</h3>
                                        {impact_list
                                            .iter()
                                            .map(|row| {
                                                view! {
                                                    <div class="impact-row">
                                                        <span class="material-name">
                                                            {row.material.clone()}
                                                        </span>
                                                        <div class="impact-track">
                                                            <div
                                                                class="impact-fill"
                                                                style=format!(
                                                                    "width: {:.2}%;",
                                                                    row.impact.clamp(0.0, 100.0),
                                                                )
                                                            ></div>
                                                        </div>
                                                        <span class="impact-label">
                                                            {format!("{:.2}%", row.impact)}
                                                        </span>
                                                    </div>
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                </Show>

                                <div class="results-card">
                                    <h3 class="results-heading">"Modulus Data"</h3>
                                    <table class="results-table">
                                        <thead>
                                            <tr>
                                                <th>"Modulus (MPa)"</th>
                                                <th>"Unaged 160C 15 min"</th>
                                                <th>"Unaged 160C 30 min"</th>
                                                <th>"Aged 100C 48 hrs"</th>
                                                <th>"Aged 70C 7 days"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {crate::report::modulus_rows(&report)
                                                .into_iter()
                                                .map(|(label, readings)| {
                                                    view! {
                                                        <tr>
                                                            <td>{label}</td>
                                                            {readings
                                                                .into_iter()
                                                                .map(|reading| {
                                                                    let text = reading
                                                                        .map(|value| format!("{value:.4}"))
                                                                        .unwrap_or_default();
                                                                    view! { <td>{text}</td> }
                                                                })
                                                                .collect_view()}
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                </div>
                            </div>
                        }
                        .into_view()
                    })
                    .unwrap_or_else(|| {
                        view! { <p class="muted">"No prediction available yet."</p> }.into_view()
                    })
            }}
            <div class="button-row">
                <button class="btn btn-secondary" type="button" on:click=move |_| on_save_json.call(())>
                    "Save Report (JSON)"
                </button>
                <button class="btn btn-secondary" type="button" on:click=move |_| on_save_xlsx.call(())>
                    "Save Report (Excel)"
                </button>
                <button class="btn" type="button" on:click=move |_| on_back.call(())>
                    "Back"
                </button>
                <button class="btn btn-primary" type="button" on:click=move |_| on_reset.call(())>
                    "New Prediction"
                </button>
            </div>
        </section>
    }
}

#[component]
fn App() -> impl IntoView {
    let (session, set_session) = create_signal(Session::default());
    let (busy, set_busy) = create_signal(false);
    let (banner, set_banner) = create_signal::<Option<Banner>>(None);

    let gateway = Gateway::default();

    let on_new = Callback::new(move |_| {
        set_session.update(|current| current.choose_new_composition());
    });

    let on_recipe_branch = Callback::new(move |_| {
        set_session.update(|current| current.choose_existing_recipe());
    });

    let on_count = Callback::new(move |count: usize| {
        set_session.update(|current| current.set_slot_count(count));
    });

    let on_slot = Callback::new(move |(index, value): (usize, String)| {
        let material = (!value.is_empty()).then_some(value);
        set_session.update(|current| current.set_slot(index, material));
    });

    let on_proceed = Callback::new(move |_| {
        let outcome = {
            let mut current = session.get_untracked();
            let outcome = current.proceed_to_composition();
            set_session.set(current);
            outcome
        };
        if let Err(error) = outcome {
            set_banner.set(Some(Banner::error(error.to_string())));
        } else {
            set_banner.set(None);
        }
    });

    let on_recipe_proceed = {
        let gateway = gateway.clone();
        Callback::new(move |name: String| {
            if busy.get_untracked() || name.is_empty() {
                return;
            }
            set_busy.set(true);
            set_banner.set(None);
            let gateway = gateway.clone();
            spawn_local(async move {
                match gateway.recipe_composition(&name).await {
                    Ok(composition) => {
                        set_session.update(|current| current.apply_recipe(name, &composition));
                    }
                    Err(error) => {
                        set_banner.set(Some(Banner::error(error.to_string())));
                    }
                }
                set_busy.set(false);
            });
        })
    };

    let on_amount = Callback::new(move |(index, value): (usize, String)| {
        set_session.update(|current| current.set_amount(index, value));
    });

    let on_predict = {
        let gateway = gateway.clone();
        Callback::new(move |_| {
            if busy.get_untracked() {
                return;
            }
            let outcome = {
                let mut current = session.get_untracked();
                let outcome = current.submit();
                set_session.set(current);
                outcome
            };
            match outcome {
                Ok(composition) => {
                    set_busy.set(true);
                    set_banner.set(None);
                    let gateway = gateway.clone();
                    spawn_local(async move {
                        match gateway.predict(&composition).await {
                            Ok(raw) => {
                                set_session.update(|current| {
                                    current.apply_prediction(format_prediction(&raw));
                                });
                            }
                            Err(error) => {
                                set_banner.set(Some(Banner::error(error.to_string())));
                            }
                        }
                        set_busy.set(false);
                    });
                }
                Err(error) => {
                    set_banner.set(Some(Banner::error(error.to_string())));
                }
            }
        })
    };

    let on_back = Callback::new(move |_| {
        set_banner.set(None);
        set_session.update(|current| current.back());
    });

    let on_reset = Callback::new(move |_| {
        set_banner.set(None);
        set_session.update(|current| current.reset());
    });

    let on_save_json = Callback::new(move |_| {
        let current = session.get_untracked();
        let (Some(composition), Some(report)) = (current.submitted(), current.report()) else {
            return;
        };
        let outcome = json_report(&iso_timestamp(), composition, report)
            .map_err(|error| error.to_string())
            .and_then(|json| {
                trigger_download(JSON_REPORT_FILENAME, "application/json", json.into_bytes())
            });
        match outcome {
            Ok(()) => set_banner.set(Some(Banner::info("JSON report download started"))),
            Err(message) => set_banner.set(Some(Banner::error(message))),
        }
    });

    let on_save_xlsx = Callback::new(move |_| {
        let current = session.get_untracked();
        let (Some(composition), Some(report)) = (current.submitted(), current.report()) else {
            return;
        };
        let outcome = workbook_bytes(&iso_timestamp(), composition, report)
            .map_err(|error| error.to_string())
            .and_then(|bytes| {
                trigger_download(
                    XLSX_REPORT_FILENAME,
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                    bytes,
                )
            });
        match outcome {
            Ok(()) => set_banner.set(Some(Banner::info("Spreadsheet download started"))),
            Err(message) => set_banner.set(Some(Banner::error(message))),
        }
    });

    view! {
        <div class="app">
            <Show when=move || busy.get()>
                <div class="loading-overlay" role="status">
                    <div class="loading-box">
                        <div class="spinner"></div>
                        <p class="loading-title">"Processing..."</p>
                        <p class="muted">"Analyzing material combinations"</p>
                    </div>
                </div>
            </Show>

            {move || {
                banner
                    .get()
                    .map(|banner| {
                        let class = match banner.kind {
                            BannerKind::Error => "banner banner-error",
                            BannerKind::Info => "banner banner-info",
                        };
                        view! {
                            <div class=class role="alert">
                                <span>{banner.message.clone()}</span>
                                <button
                                    class="banner-dismiss"
                                    type="button"
                                    on:click=move |_| set_banner.set(None)
                                >
                                    "×"
                                </button>
                            </div>
                        }
                    })
            }}

            <Show when=move || session.get().screen() == Screen::Start>
                <StartScreen on_new=on_new on_recipe=on_recipe_branch />
            </Show>

            <Show when=move || session.get().screen() == Screen::RecipeSelection>
                <RecipeScreen
                    gateway=gateway.clone()
                    busy=busy
                    on_back=on_back
                    on_proceed=on_recipe_proceed
                />
            </Show>

            <Show when=move || session.get().screen() == Screen::MaterialSelection>
                <MaterialSelectionScreen
                    session=session
                    on_count=on_count
                    on_slot=on_slot
                    on_back=on_back
                    on_proceed=on_proceed
                />
            </Show>

            <Show when=move || session.get().screen() == Screen::MaterialComposition>
                <CompositionScreen
                    session=session
                    busy=busy
                    on_amount=on_amount
                    on_back=on_back
                    on_predict=on_predict
                />
            </Show>

            <Show when=move || session.get().screen() == Screen::PredictionResults>
                <ResultsScreen
                    session=session
                    on_back=on_back
                    on_reset=on_reset
                    on_save_json=on_save_json
                    on_save_xlsx=on_save_xlsx
                />
            </Show>
        </div>
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(|| view! { <App /> });
}
