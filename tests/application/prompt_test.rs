use myna::application::services::{language_name, system_prompt, PromptError, TRANSLATION_LANGUAGES};
use myna::domain::PipelineTask;

#[test]
fn given_transcribe_task_when_prompt_requested_then_no_prompt_exists() {
    let result = system_prompt(PipelineTask::Transcribe, None);

    assert_eq!(result, Err(PromptError::UnmappedTask(PipelineTask::Transcribe)));
}

#[test]
fn given_correct_and_summarize_tasks_then_prompts_differ() {
    let correct = system_prompt(PipelineTask::Correct, None).unwrap();
    let summarize = system_prompt(PipelineTask::Summarize, None).unwrap();

    assert_ne!(correct, summarize);
    assert!(correct.contains("editor"));
    assert!(summarize.contains("summar"));
}

#[test]
fn given_translate_task_then_prompt_names_the_target_language() {
    let english = system_prompt(PipelineTask::Translate, Some("en")).unwrap();
    let german = system_prompt(PipelineTask::Translate, Some("de")).unwrap();

    assert!(english.contains("English"));
    assert!(german.contains("German"));
    assert_ne!(english, german);
}

#[test]
fn given_translate_task_without_target_then_prompt_is_rejected() {
    let result = system_prompt(PipelineTask::Translate, None);

    assert_eq!(result, Err(PromptError::MissingTargetLanguage));
}

#[test]
fn given_same_inputs_when_prompt_built_twice_then_output_is_identical() {
    let first = system_prompt(PipelineTask::Translate, Some("ja")).unwrap();
    let second = system_prompt(PipelineTask::Translate, Some("ja")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn given_unknown_language_code_then_name_passes_through() {
    assert_eq!(language_name("ru"), "Russian");
    assert_eq!(language_name("ko"), "Korean");
    assert_eq!(language_name("tlh"), "tlh");
}

#[test]
fn given_translation_targets_then_each_has_a_display_name() {
    assert_eq!(TRANSLATION_LANGUAGES.len(), 7);
    for code in TRANSLATION_LANGUAGES {
        assert_ne!(language_name(code), *code);
    }
}
