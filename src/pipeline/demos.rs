//! The biography-style few-shot demonstration pool for the Atomic Fact
//! Extractor (component B).
//!
//! `atomic_facts.py` loads `demons.json` (a `sentence -> [fact, ...]` map) at
//! startup and keeps two disjoint views of it: the first `n = 7` entries are
//! prepended to every extraction prompt unconditionally, and the remaining
//! entries are BM25-searched per sentence for the top `k = 1` match. The
//! `demons.json` file itself is not present in the retrieved pack, so this
//! module authors a small representative biography-style pool of the same
//! shape in its place.

/// One demonstration: a source sentence and its gold atomic-fact breakdown.
#[derive(Debug, Clone)]
pub struct Demo {
    /// The example sentence shown to the model.
    pub sentence: &'static str,
    /// The atomic facts the sentence should break down into.
    pub facts: &'static [&'static str],
}

/// The demonstration pool, in a fixed order. The first
/// [`crate::config::DEFAULT_FIXED_DEMO_COUNT`] entries are the "fixed"
/// demonstrations; the rest are the BM25-searchable remainder.
pub const DEMOS: &[Demo] = &[
    Demo {
        sentence: "Michael Collins was an American astronaut who served as the Command Module Pilot for the Apollo 11 mission.",
        facts: &[
            "Michael Collins was an American astronaut.",
            "Michael Collins served as the Command Module Pilot.",
            "Michael Collins served as the Command Module Pilot for the Apollo 11 mission.",
        ],
    },
    Demo {
        sentence: "Serena Williams, born in 1981, is a former professional tennis player who won 23 Grand Slam singles titles.",
        facts: &[
            "Serena Williams was born in 1981.",
            "Serena Williams is a former professional tennis player.",
            "Serena Williams won 23 Grand Slam singles titles.",
        ],
    },
    Demo {
        sentence: "The Eiffel Tower, completed in 1889, is a wrought-iron lattice tower located on the Champ de Mars in Paris.",
        facts: &[
            "The Eiffel Tower was completed in 1889.",
            "The Eiffel Tower is a wrought-iron lattice tower.",
            "The Eiffel Tower is located on the Champ de Mars.",
            "The Eiffel Tower is located in Paris.",
        ],
    },
    Demo {
        sentence: "Marie Curie, a Polish-born physicist and chemist, was the first woman to win a Nobel Prize.",
        facts: &[
            "Marie Curie was a physicist.",
            "Marie Curie was a chemist.",
            "Marie Curie was Polish-born.",
            "Marie Curie was the first woman to win a Nobel Prize.",
        ],
    },
    Demo {
        sentence: "Founded in 1975, Microsoft is an American multinational technology corporation headquartered in Redmond, Washington.",
        facts: &[
            "Microsoft was founded in 1975.",
            "Microsoft is an American multinational technology corporation.",
            "Microsoft is headquartered in Redmond, Washington.",
        ],
    },
    Demo {
        sentence: "Yo-Yo Ma is a French-born American cellist who has won eighteen Grammy Awards.",
        facts: &[
            "Yo-Yo Ma is a cellist.",
            "Yo-Yo Ma was born in France.",
            "Yo-Yo Ma is American.",
            "Yo-Yo Ma has won eighteen Grammy Awards.",
        ],
    },
    Demo {
        sentence: "Mount Kilimanjaro, the highest mountain in Africa, stands at 5,895 meters above sea level.",
        facts: &[
            "Mount Kilimanjaro is the highest mountain in Africa.",
            "Mount Kilimanjaro stands at 5,895 meters above sea level.",
        ],
    },
    Demo {
        sentence: "Ada Lovelace, an English mathematician, is often regarded as the first computer programmer for her work on Charles Babbage's Analytical Engine.",
        facts: &[
            "Ada Lovelace was an English mathematician.",
            "Ada Lovelace is often regarded as the first computer programmer.",
            "Ada Lovelace's work was on Charles Babbage's Analytical Engine.",
        ],
    },
    Demo {
        sentence: "Lanny Flaherty is an American actor born on December 18, 1949, known for his supporting roles in film and television.",
        facts: &[
            "Lanny Flaherty is an American actor.",
            "Lanny Flaherty was born on December 18, 1949.",
            "Lanny Flaherty is known for his supporting roles in film and television.",
        ],
    },
];
