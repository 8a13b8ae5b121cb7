use crate::sampler::Sample;

/// Instructions for folder naming
pub const FOLDER_NAME_PROMPT: &str = r#"You are given several representative snippets of files contained in a folder.
Suggest a concise, filesystem-friendly folder name (3 words max) that best describes the folder's contents.
Return only the suggested name, no punctuation, no explanation."#;

/// Build the user prompt from the first `max_samples` samples
pub fn build_folder_name_prompt(samples: &[Sample], max_samples: usize) -> String {
    let body = samples
        .iter()
        .take(max_samples)
        .map(Sample::to_prompt_text)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n\nSamples:\n{}", FOLDER_NAME_PROMPT, body)
}
