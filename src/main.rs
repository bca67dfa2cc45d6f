#[cfg(target_arch = "wasm32")]
mod sandbox {
    use compoundlab::{
        CompositionEntry, PredictionReport, demo_composition, format_prediction, mock_prediction,
        total_weight,
    };
    use leptos::*;
    use rand::SeedableRng;

    fn sandbox_report() -> PredictionReport {
        let mut rng = rand::rngs::StdRng::from_entropy();
        format_prediction(&mock_prediction(&mut rng, &demo_composition()))
    }

    #[component]
    fn ReportCard(composition: Vec<CompositionEntry>, report: PredictionReport) -> impl IntoView {
        let total = total_weight(&composition);

        view! {
            <section class="report-card">
                <div class="recap-area">
                    <p class="eyebrow">Composition</p>
                    {composition
                        .iter()
                        .map(|entry| {
                            view! {
                                <p class="recap-line">
                                    {format!("{} — {} g", entry.material, entry.composition)}
                                </p>
                            }
                        })
                        .collect_view()}
                    <p class="recap-line total">{format!("Total — {total:.2} g")}</p>
                </div>
                <div class="property-area">
                    <p class="eyebrow">Predicted properties</p>
                    <p>{format!("Tensile strength: {:.2} MPa", report.tensile_strength)}</p>
                    <p>{format!("Elongation at break: {:.2}%", report.elongation)}</p>
                    <p>{format!("Hardness: {:.2} Shore A", report.hardness)}</p>
                    <p>{format!("Tear strength: {:.2} kN/m", report.tear_strength)}</p>
                    <p>{format!("Density: {:.3} g/cm3", report.density)}</p>
                    <p>{format!("Confidence: {:.1}%", report.confidence_score)}</p>
                </div>
                <div class="impact-area">
                    <p class="eyebrow">Material impacts</p>
                    {report
                        .material_impacts
                        .iter()
                        .map(|row| {
                            view! {
                                <p class="recap-line">
                                    {format!("{}: {:.2}%", row.material, row.impact)}
                                </p>
                            }
                        })
                        .collect_view()}
                </div>
            </section>
        }
    }

    #[component]
    fn App() -> impl IntoView {
        let (report, set_report) = create_signal::<Option<PredictionReport>>(None);

        let regenerate = move |_| {
            set_report.set(Some(sandbox_report()));
        };

        view! {
            <main class="page">
                <header class="page-header">
                    <div>
                        <p class="eyebrow">Compound Prediction Sandbox</p>
                        <h1 class="headline">Wasm-ready Leptos frontend</h1>
                        <p class="lede">
                            "Preview the formatter and mock predictor without a service."
                        </p>
                    </div>
                    <button class="primary" on:click=regenerate>
                        "Generate mock prediction"
                    </button>
                </header>

                {move || {
                    if let Some(current) = report.get() {
                        view! { <ReportCard composition=demo_composition() report=current /> }
                            .into_view()
                    } else {
                        view! {
                            <section class="placeholder-card">
                                <p class="eyebrow">Awaiting prediction</p>
                                <p class="lede">
                                    "Generate a mock prediction to verify wasm bindings and styling."
                                </p>
                            </section>
                        }
                        .into_view()
                    }
                }}
            </main>
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        mount_to_body(|| view! { <App /> });
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    sandbox::run();
}

/// Native fallback: print the demo report so the formatter and exporter can
/// be eyeballed without a browser.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), compoundlab::ReportError> {
    let composition = compoundlab::demo_composition();
    let report = compoundlab::demo_report();
    let json = compoundlab::json_report("1970-01-01T00:00:00.000Z", &composition, &report)?;
    println!("{json}");
    Ok(())
}
