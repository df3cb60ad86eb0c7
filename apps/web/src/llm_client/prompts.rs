// Prompt constants for recipe generation.
// The markup contract promised here is exactly what `generation::markup`
// converts back to HTML, so the two must change together.

/// Recipe generation prompt. Replace `{ingredients}` before sending.
pub const RECIPE_PROMPT_TEMPLATE: &str = "\
    Generate a recipe using these ingredients: {ingredients}.\n\
    Format the recipe with:\n\
    - Title preceded and followed by ##\n\
    - Ingredients section marked with **Ingredients:**\n\
    - Each ingredient numbered, preceded and followed by a single ~\n\
    - Instructions section marked with **Instructions:**\n\
    - Each instruction numbered, preceded and followed by a single ~\n\
    - Tips section marked with **Tips:**";
