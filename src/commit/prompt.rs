//! Prompt construction for AI-generated commit messages.
//!
//! The prompt is a fixed template selected by language, with a style
//! instruction block selected by language and commit style. Rendering is a
//! pure function of its inputs.

use crate::config::{CommitStyle, Language};
use crate::git::RepositorySnapshot;

/// Fixed wording of the prompt for one language.
struct PromptTemplate {
    intro: &'static str,
    diff_heading: &'static str,
    files_heading: &'static str,
    branch_label: &'static str,
    requirements_heading: &'static str,
    important_heading: &'static str,
    directives: [&'static str; 4],
    closing: &'static str,
}

const ZH_CN_TEMPLATE: PromptTemplate = PromptTemplate {
    intro: "你是一个专业的Git提交信息生成助手。请根据以下Git代码变更，生成一条专业的提交信息。",
    diff_heading: "**代码差异：**",
    files_heading: "**变更文件：**",
    branch_label: "**当前分支：**",
    requirements_heading: "**要求：**",
    important_heading: "**重要提示：**",
    directives: [
        "只返回提交信息文本，不要包含代码块标记（```）或其他格式",
        "提交信息应该准确反映代码变更的内容",
        "使用中文描述",
        "保持简洁专业",
    ],
    closing: "请直接返回提交信息：",
};

const EN_TEMPLATE: PromptTemplate = PromptTemplate {
    intro: "You are a professional Git commit message generator. Please generate a professional commit message based on the following Git code changes.",
    diff_heading: "**Code Diff:**",
    files_heading: "**Changed Files:**",
    branch_label: "**Current Branch:**",
    requirements_heading: "**Requirements:**",
    important_heading: "**Important:**",
    directives: [
        "Return only the commit message text, no code block markers (```) or other formatting",
        "The commit message should accurately reflect the code changes",
        "Use English",
        "Keep it concise and professional",
    ],
    closing: "Please return the commit message directly:",
};

const ZH_CN_CONVENTIONAL: &str = "
请遵循Conventional Commits规范生成提交信息：
- 格式：<type>(<scope>): <subject>
- type类型：feat(新功能)、fix(修复)、docs(文档)、style(格式)、refactor(重构)、test(测试)、chore(构建/工具)
- scope：可选，表示影响范围
- subject：简短描述，不超过50字符
- 如果需要，可以在空行后添加详细描述
";

const ZH_CN_EMOJI: &str = "
请使用emoji风格的提交信息：
- ✨ 新功能
- 🐛 修复bug
- 📝 文档
- 💄 样式
- ♻️ 重构
- ✅ 测试
- 🔧 工具/构建
格式：<emoji> <简短描述>
";

const ZH_CN_SIMPLE: &str = "请生成简洁明了的提交信息，不超过72字符。";

const EN_CONVENTIONAL: &str = "
Please follow Conventional Commits specification:
- Format: <type>(<scope>): <subject>
- Types: feat, fix, docs, style, refactor, test, chore
- scope: optional, indicates the scope of change
- subject: brief description, max 50 characters
- Optionally add detailed description after blank line
";

const EN_EMOJI: &str = "
Please use emoji-style commit message:
- ✨ New feature
- 🐛 Bug fix
- 📝 Documentation
- 💄 Style
- ♻️ Refactor
- ✅ Test
- 🔧 Tool/Build
Format: <emoji> <brief description>
";

const EN_SIMPLE: &str = "Please generate a concise commit message, max 72 characters.";

fn template(language: Language) -> &'static PromptTemplate {
    match language {
        Language::ZhCn => &ZH_CN_TEMPLATE,
        Language::En => &EN_TEMPLATE,
    }
}

/// The style instruction block for one cell of the language × style matrix.
pub fn style_instruction(style: CommitStyle, language: Language) -> &'static str {
    match (language, style) {
        (Language::ZhCn, CommitStyle::Conventional) => ZH_CN_CONVENTIONAL,
        (Language::ZhCn, CommitStyle::Emoji) => ZH_CN_EMOJI,
        (Language::ZhCn, CommitStyle::Simple) => ZH_CN_SIMPLE,
        (Language::En, CommitStyle::Conventional) => EN_CONVENTIONAL,
        (Language::En, CommitStyle::Emoji) => EN_EMOJI,
        (Language::En, CommitStyle::Simple) => EN_SIMPLE,
    }
}

/// Build the LLM prompt for generating a commit message.
///
/// Embeds the snapshot's diff in a fenced block, one bullet per staged file
/// in snapshot order, the branch name, the style instruction block and the
/// output-format directives.
pub fn build_commit_prompt(
    snapshot: &RepositorySnapshot,
    style: CommitStyle,
    language: Language,
) -> String {
    let t = template(language);

    let files_section = snapshot
        .changed_files
        .iter()
        .map(|f| format!("- {f}"))
        .collect::<Vec<_>>()
        .join("\n");

    let directives = t
        .directives
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}. {}", i + 1, d))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{intro}\n\n{diff_heading}\n```\n{diff}\n```\n\n{files_heading}\n{files_section}\n\n{branch_label} {branch}\n\n{requirements_heading}\n{style_block}\n\n{important_heading}\n{directives}\n\n{closing}",
        intro = t.intro,
        diff_heading = t.diff_heading,
        diff = snapshot.diff,
        files_heading = t.files_heading,
        branch_label = t.branch_label,
        branch = snapshot.branch_name,
        requirements_heading = t.requirements_heading,
        style_block = style_instruction(style, language),
        important_heading = t.important_heading,
        closing = t.closing,
    )
}
