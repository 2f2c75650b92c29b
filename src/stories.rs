use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ExampleStory {
    pub title: &'static str,
    pub content: &'static str,
}

/// Built-in sample stories served by `/api/examples` so the demo works
/// without the user writing anything.
pub const EXAMPLE_STORIES: &[ExampleStory] = &[
    ExampleStory {
        title: "The Potter's Last Kiln",
        content: "In an old village lived an elderly master potter. He had spent a lifetime \
shaping clay into vessels, firing his memories into every piece. His hands were covered in \
cracks, like the texture of the jars he threw. The young people had all left for the city; \
only he still kept the dying craft alive.\n\n\
On a rainy night he lit his kiln for the last time. In the firelight he saw his whole life: \
the wonder of touching clay for the first time as a child, the hardship of his apprentice \
years, the loneliness of his final vigil. When the villagers found him the next morning, the \
jars in the kiln had finished firing, smooth and warm as jade. The old man sat quietly beside \
them with a contented smile, as if he himself had become his final work.\n\n\
The story spread across the region, and that last jar was placed in a museum. People say that \
if you listen closely, you can still hear the kiln fire burning inside it, a craftsman's \
gentlest words to time itself.",
    },
    ExampleStory {
        title: "The Library's Night Watchman",
        content: "In the old quarter of the city stands a library over a hundred years old. \
Every night after closing, the watchman, old Zhang, walks the aisles between the shelves. \
The books, he says, also need company.\n\n\
One night he found a yellowed diary wedged between two heavy history volumes. It had belonged \
to a young librarian who, during the war, risked her life moving rare books to safety. The \
last page read: \"Knowledge is humanity's most precious wealth, worth guarding with our \
lives.\"\n\n\
Old Zhang placed the diary in the library's most visible spot. Since then, every visitor can \
read her story. People began to understand that guarding knowledge is not merely a job but an \
inheritance.",
    },
    ExampleStory {
        title: "Grandmother's Recipe Book",
        content: "After my grandmother passed away, I found a handwritten recipe book in her \
old trunk. Every page recorded a dish, with little drawings in her own hand. What moved me \
most were the notes after each recipe.\n\n\
\"Braised pork: your grandfather's favorite; he always had a second bowl of rice with it.\" \
\"Sweet and sour ribs: your father wouldn't eat as a boy, so I made this to coax him.\" \
\"Tomato and egg: I made this the day you were born, to celebrate.\"\n\n\
Every dish carried a story, a memory. I decided to learn them all, not only because they are \
delicious, but because they are the code of love my grandmother left me.",
    },
];
