/// Build the instruction sent to the model for one issue request.
///
/// The request is embedded verbatim. Nothing here guards against a request
/// that tries to override the instructions.
pub fn build_prompt(request: &str) -> String {
    format!(
        r#"
You are an autonomous coding agent operating inside a GitHub repository.
The user has submitted this request via a GitHub issue:
"{request}"

Read the request and write the necessary code.
You MUST return your response ONLY as a valid JSON array of objects.
Each object must have a 'filename' (including the path if needed) and 'content'.
Do not include any other text, markdown formatting, or explanations.

Example format:
[
  {{"filename": "main.py", "content": "print('hello world')"}},
  {{"filename": "utils/math.py", "content": "def add(a, b): return a + b"}}
]
"#
    )
}
