use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata shown by `notifiers --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
