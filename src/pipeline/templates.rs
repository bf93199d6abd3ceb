//! Few-shot prompt templates for components B-F.
//!
//! Treated as opaque string constants with named placeholders (Section 9:
//! "Changing a template must be a visible code change"). Placeholders are
//! replaced with `str::replace` rather than a templating engine, matching
//! `classify_relevance.py`/`rate_atomic_fact.py`'s placeholder-substitution
//! style.

/// Instruction header prepended to every atomic-fact extraction prompt
/// (component B), ahead of the demonstration block.
pub const ATOMIC_FACT_INSTRUCTION: &str = "\
Instructions:
1. You are given a sentence. Break the sentence down into a list of atomic facts.
2. An atomic fact is a sentence containing a single, checkable piece of information.
3. Each atomic fact in the list should check a different piece of information.
4. Use the examples above to learn the expected format.
5. Output only the atomic facts as a list, with each item starting with \"- \". Do not add any other text.
6. Do this only for the final sentence given below.
";

const PROMPT_PLACEHOLDER: &str = "[PROMPT]";
const RESPONSE_PLACEHOLDER: &str = "[RESPONSE]";
const STATEMENT_PLACEHOLDER: &str = "[STATEMENT]";
const KNOWLEDGE_PLACEHOLDER: &str = "[KNOWLEDGE]";

const RELEVANCE_FORMAT: &str = "\
Two subjects in a RESPONSE are considered [Foo] when the RESPONSE itself explains \
how the two subjects relate to each other.

Instructions:
1. The STATEMENT below was pulled out of the larger RESPONSE to the QUESTION.
2. Name the subject of the STATEMENT and the subject of the QUESTION.
3. Decide whether those two subjects should be considered [Foo], using the definition above.
4. Think step by step and show your reasoning before giving an answer.
5. If the subjects are [Foo], end your reasoning with \"[Foo]\"; otherwise end with \"[Not Foo]\".
6. Apply this to the STATEMENT and RESPONSE under \"Your Task\" below. Worked examples are given first.

Example 1:
QUESTION:
What field did Ada Lovelace work in?

RESPONSE:
Ada Lovelace worked closely with Charles Babbage on the Analytical Engine, and her notes \
on the machine are considered the first published algorithm. Babbage himself never \
finished building a working version of the Engine.

STATEMENT:
Babbage never finished building a working Analytical Engine.

SOLUTION:
The subject of the QUESTION is Ada Lovelace. The subject of the STATEMENT is Charles \
Babbage. The RESPONSE explains their relationship directly: Lovelace worked with Babbage \
on the machine he designed. So the subjects are [Foo].

Example 2:
QUESTION:
What field did Ada Lovelace work in?

RESPONSE:
Ada Lovelace worked closely with Charles Babbage on the Analytical Engine, and her notes \
on the machine are considered the first published algorithm. Grace Hopper later \
popularized the term \"debugging\" in computing.

STATEMENT:
Grace Hopper popularized the term \"debugging.\"

SOLUTION:
The subject of the QUESTION is Ada Lovelace. The subject of the STATEMENT is Grace \
Hopper. Both are associated with early computing, but the RESPONSE never says how \
Lovelace and Hopper relate to each other. So the subjects are [Not Foo].

Your Task:
QUESTION:
[PROMPT]

RESPONSE:
[RESPONSE]

STATEMENT:
[STATEMENT]
";

const REVISE_FORMAT: &str = "\
Vague references include, but are not limited to:
- Pronouns (\"his\", \"they\", \"her\")
- Unresolved entities (\"this event\", \"the company\", \"the invention\")
- Partial names (\"Jeff...\" or \"Bezos...\" for Jeff Bezos)

Instructions:
1. The STATEMENT below was pulled out of the larger RESPONSE.
2. Rewrite the STATEMENT so every vague reference is replaced by the entity the RESPONSE \
shows it refers to.
3. Do not change any factual claim already in the STATEMENT.
4. Do not add any new factual claim to the STATEMENT.
5. Think step by step: identify the subject of the STATEMENT, decide whether it is vague, \
and if so find the entity the RESPONSE resolves it to.
6. After your reasoning, give the revised statement in a fenced code block.
7. Apply this to the STATEMENT and RESPONSE under \"Your Task\" below. Worked examples are given first.

Example 1:
STATEMENT:
Acorns is a company.

RESPONSE:
Acorns is a financial technology company founded in 2012 that provides micro-investing \
services. It is headquartered in Irvine, California.

REVISED STATEMENT:
The subject \"Acorns\" is a proper name, not a pronoun or an unresolved reference, and \
the RESPONSE never narrows it further. It is not vague. So:
```
Acorns is a company.
```

Example 2:
STATEMENT:
He teaches at the University of Montreal.

RESPONSE:
After his Ph.D., Quoc Le joined a deep learning research group. Geoffrey Hinton, an \
adjunct professor at the University of Montreal, has long been a mentor to Le.

REVISED STATEMENT:
The subject \"he\" is a pronoun. Scanning the RESPONSE, the sentence about teaching at \
the University of Montreal is attached to Geoffrey Hinton, so \"he\" resolves to \
Geoffrey Hinton. So:
```
Geoffrey Hinton teaches at the University of Montreal.
```

Example 3:
STATEMENT:
Dean joined Google in 1999.

RESPONSE:
Jeff Dean is a Google Senior Fellow who has led major infrastructure projects. Dean \
joined Google in 1999 and has been central to its technical direction since.

REVISED STATEMENT:
The subject \"Dean\" is a bare surname, a partial-name reference. The RESPONSE gives the \
full name \"Jeff Dean\" earlier, so \"Dean\" resolves to Jeff Dean. So:
```
Jeff Dean joined Google in 1999.
```

Your Task:
STATEMENT:
[STATEMENT]

RESPONSE:
[RESPONSE]
";

const NEXT_SEARCH_FORMAT: &str = "\
Instructions:
1. You are given a STATEMENT and some KNOWLEDGE gathered so far.
2. Your goal is to find evidence that either supports or contradicts the STATEMENT.
3. You may issue exactly ONE web search query that you think will surface useful new evidence.
4. Aim the query at information that is not already present in the KNOWLEDGE.
5. Put your final query in a fenced code block, with nothing else inside it.

KNOWLEDGE:
[KNOWLEDGE]

STATEMENT:
[STATEMENT]
";

const FINAL_ANSWER_FORMAT: &str = "\
Instructions:
1. You are given a STATEMENT and some KNOWLEDGE gathered about it.
2. Decide whether the STATEMENT is supported by the KNOWLEDGE. The KNOWLEDGE does not \
need to state the STATEMENT word for word, but it should strongly imply it.
3. Think step by step and show your reasoning, including a short summary of the relevant \
KNOWLEDGE.
4. If the STATEMENT is supported, point to the specific evidence in your reasoning.
5. After your reasoning, restate the STATEMENT, then give your final answer.
6. Your final answer must be exactly \"Supported\" or \"Not Supported\", wrapped in square brackets.

KNOWLEDGE:
[KNOWLEDGE]

STATEMENT:
[STATEMENT]
";

/// Builds the extraction prompt body for one sentence: the demonstration
/// block (already rendered by the caller) followed by the target sentence.
#[must_use]
pub fn extraction_target_line(sentence: &str) -> String {
    format!("Please break down the following sentence into independent facts: {sentence}\n")
}

/// Renders one demonstration block the extraction prompt includes.
#[must_use]
pub fn render_demo(sentence: &str, facts: &[&str]) -> String {
    let mut block = format!("Please break down the following sentence into independent facts: {sentence}\n");
    for fact in facts {
        block.push_str("- ");
        block.push_str(fact);
        block.push('\n');
    }
    block.push('\n');
    block
}

/// Renders the relevance-classification prompt (component D).
#[must_use]
pub fn relevance_prompt(prompt: &str, response: &str, atomic_fact: &str) -> String {
    RELEVANCE_FORMAT
        .replace(PROMPT_PLACEHOLDER, prompt)
        .replace(RESPONSE_PLACEHOLDER, response)
        .replace(STATEMENT_PLACEHOLDER, atomic_fact)
}

/// Renders the decontextualization prompt (component C).
#[must_use]
pub fn revise_prompt(response: &str, atomic_fact: &str) -> String {
    REVISE_FORMAT
        .replace(STATEMENT_PLACEHOLDER, atomic_fact)
        .replace(RESPONSE_PLACEHOLDER, response)
}

/// Renders the next-search-query prompt (component E).
#[must_use]
pub fn next_search_prompt(atomic_fact: &str, knowledge: &str) -> String {
    let knowledge = if knowledge.is_empty() { "N/A" } else { knowledge };
    NEXT_SEARCH_FORMAT
        .replace(STATEMENT_PLACEHOLDER, atomic_fact)
        .replace(KNOWLEDGE_PLACEHOLDER, knowledge)
}

/// Renders the final-verdict prompt (component F).
#[must_use]
pub fn final_answer_prompt(atomic_fact: &str, knowledge: &str) -> String {
    FINAL_ANSWER_FORMAT
        .replace(STATEMENT_PLACEHOLDER, atomic_fact)
        .replace(KNOWLEDGE_PLACEHOLDER, knowledge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_prompt_substitutes_all_placeholders() {
        let prompt = relevance_prompt("Who is X?", "X did Y.", "X did Y.");
        assert!(!prompt.contains(PROMPT_PLACEHOLDER));
        assert!(!prompt.contains(RESPONSE_PLACEHOLDER));
        assert!(!prompt.contains(STATEMENT_PLACEHOLDER));
        assert!(prompt.contains("Who is X?"));
    }

    #[test]
    fn test_next_search_prompt_defaults_empty_knowledge_to_na() {
        let prompt = next_search_prompt("X did Y.", "");
        assert!(prompt.contains("N/A"));
    }

    #[test]
    fn test_final_answer_prompt_carries_knowledge() {
        let prompt = final_answer_prompt("X did Y.", "Evidence that X did Y.");
        assert!(prompt.contains("Evidence that X did Y."));
        assert!(!prompt.contains(KNOWLEDGE_PLACEHOLDER));
    }

    #[test]
    fn test_render_demo_bullets_each_fact() {
        let block = render_demo("X did Y.", &["X did Y.", "X exists."]);
        assert!(block.contains("- X did Y.\n"));
        assert!(block.contains("- X exists.\n"));
    }
}
