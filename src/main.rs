fn main() {
    if let Err(e) = symptom_triage::run() {
        tracing::error!(error = %e, "Triage failed");
        eprintln!("symptom-triage: {e}");
        std::process::exit(1);
    }
}
