//! Fixed category → keyword table the classifier matches against.
//!
//! Category and keyword order matter: the lookup index is built by walking
//! the table front to back, so a keyword listed under two categories belongs
//! to the later one.

use crate::ClassifierError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

/// Lowercased, trimmed form used as the key in every derived table.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Result<Self, ClassifierError> {
        if categories.is_empty() {
            return Err(ClassifierError::Taxonomy("taxonomy has no categories".into()));
        }
        for cat in &categories {
            if cat.name.trim().is_empty() {
                return Err(ClassifierError::Taxonomy("category with empty name".into()));
            }
            if cat.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(ClassifierError::Taxonomy(format!(
                    "category {:?} has no keywords",
                    cat.name
                )));
            }
        }
        Ok(Self { categories })
    }

    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Result<Self, ClassifierError> {
        Self::new(
            pairs
                .iter()
                .map(|(name, keywords)| Category {
                    name: name.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        )
    }

    /// The grocery table compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            categories: BUILTIN
                .iter()
                .map(|(name, keywords)| Category {
                    name: name.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ClassifierError> {
        let parsed: Taxonomy =
            toml::from_str(raw).map_err(|e| ClassifierError::Taxonomy(e.to_string()))?;
        Self::new(parsed.categories)
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ClassifierError::Taxonomy(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Every (category, normalized keyword) pair in table order, blanks skipped.
    pub fn entries(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.categories.iter().flat_map(|cat| {
            cat.keywords
                .iter()
                .map(|k| normalize_keyword(k))
                .filter(|k| !k.is_empty())
                .map(move |k| (cat.name.as_str(), k))
        })
    }

    /// Distinct normalized keywords in order of first appearance.
    pub fn unique_keywords(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries()
            .filter_map(|(_, k)| seen.insert(k.clone()).then_some(k))
            .collect()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Dairy & Eggs",
        &[
            "milk", "flavour milk", "whole milk", "skim milk", "low-fat milk", "butter",
            "unsalted butter", "salted butter", "cheese", "cheddar", "mozzarella", "parmesan",
            "gouda", "feta", "brie", "camembert", "blue cheese", "cream cheese", "goat cheese",
            "ricotta", "yogurt", "Greek yogurt", "flavored yogurt", "plain yogurt",
            "Mixed Berry Yoghurt", "Strawberry Yoghurt", "cream", "heavy cream",
            "apricot yoghurt", "vanilla yoghurt", "whipping cream", "double cream",
            "sour cream", "custard", "margarine", "eggs", "chicken eggs", "duck eggs",
            "quail eggs", "buttermilk", "kefir", "curd", "paneer", "ghee", "spread", "eggwhite",
            "egg yolk", "powdered milk", "condensed milk", "evaporated milk", "milkshake",
            "ice cream", "frozen yogurt", "whey", "lactose-free milk", "almond milk",
            "soy milk", "oat milk", "coconut milk", "cashew milk", "milk powder",
            "clarified butter", "probiotic drinks", "quark", "clotted cream",
        ],
    ),
    (
        "Bread & Bakery",
        &[
            "bread", "white bread", "whole wheat bread", "multigrain bread", "rye bread",
            "sourdough", "pita bread", "ciabatta", "focaccia", "roll", "dinner roll", "bun",
            "burger bun", "hot dog bun", "bagel", "plain bagel", "sesame bagel",
            "everything bagel", "muffin", "blueberry muffin", "chocolate chip muffin",
            "croissant", "almond croissant", "pastry", "danish", "eclair", "strudel", "cake",
            "chocolate cake", "vanilla cake", "sponge cake", "fruit cake", "loaf",
            "banana bread", "pumpkin bread", "baguette", "crumpet", "waffle", "Belgian waffle",
            "pancake", "donut", "glazed donut", "chocolate donut", "doughnut", "pie",
            "apple pie", "cherry pie", "pumpkin pie", "tart", "fruit tart", "custard tart",
            "scone", "plain scone", "raisin scone", "brioche", "flatbread", "naan", "paratha",
            "chapati", "lavash", "rolls", "buns", "wrap", "tortilla", "flour tortilla",
            "corn tortilla", "cinnamon roll", "pretzel", "breadsticks", "English muffin",
            "hot cross bun", "shortbread", "biscuit", "cracker", "grissini", "pavlova",
            "macaron", "cookie", "gingerbread", "puff pastry", "challah", "matzo", "baps",
            "wholemeal", "batard", "turnovers", "pizza bread",
        ],
    ),
    (
        "Beverages",
        &[
            "juice", "orange juice", "apple juice", "grape juice", "cranberry juice",
            "pineapple juice", "tomato juice", "pomegranate juice", "carrot juice",
            "beet juice", "water", "sparkling water", "mineral water", "flavored water",
            "coffee", "black coffee", "espresso", "latte", "cappuccino", "americano",
            "macchiato", "mocha", "iced coffee", "cold brew", "tea", "black tea", "green tea",
            "herbal tea", "chai", "matcha", "iced tea", "drink", "energy drink", "sports drink",
            "soda", "cola", "lemon-lime soda", "root beer", "ginger ale", "tonic water",
            "club soda", "pop", "beverage", "smoothie", "fruit smoothie", "protein shake",
            "cocktail", "martini", "margarita", "mojito", "pina colada", "daiquiri",
            "bloody mary", "wine", "red wine", "white wine", "rosé wine", "sparkling wine",
            "champagne", "beer", "ale", "lager", "stout", "porter", "pilsner", "cider",
            "hard cider", "spirits", "liquor", "vodka", "flavored vodka", "gin", "rum",
            "dark rum", "white rum", "whiskey", "bourbon", "scotch", "rye whiskey", "cordial",
            "syrup", "simple syrup", "grenadine", "concentrate", "shake", "milkshake",
            "chocolate milkshake", "strawberry milkshake", "bubble tea", "kombucha",
            "matcha latte", "hot chocolate", "chai latte", "iced matcha", "tonic", "lemonade",
            "limeade",
        ],
    ),
    (
        "Pantry Items",
        &[
            "sugar", "white sugar", "brown sugar", "powdered sugar", "salt", "sea salt",
            "kosher salt", "pink Himalayan salt", "flour", "all-purpose flour",
            "whole wheat flour", "bread flour", "oil", "olive oil", "vegetable oil",
            "canola oil", "coconut oil", "sunflower oil", "avocado oil", "sesame oil",
            "vinegar", "white vinegar", "apple cider vinegar", "balsamic vinegar",
            "rice vinegar", "red wine vinegar", "sauce", "soy sauce", "hot sauce", "BBQ sauce",
            "tomato sauce", "paste", "tomato paste", "chili paste", "garlic paste", "soup",
            "stock", "chicken stock", "beef stock", "vegetable stock", "broth", "seasoning",
            "spice", "herb", "basil", "oregano", "thyme", "extract", "vanilla extract",
            "almond extract", "essence", "powder", "garlic powder", "onion powder",
            "cocoa powder", "mix", "pancake mix", "cake mix", "marinade", "glaze",
            "ranch dressing", "Italian dressing", "condiment", "mayo", "mayonnaise", "mustard",
            "Dijon mustard", "whole grain mustard", "ketchup", "relish", "chutney", "jam",
            "strawberry jam", "apricot jam", "jelly", "preserves", "honey", "maple syrup",
            "syrup", "peanut butter", "almond butter", "Nutella", "marmite", "vegemite",
            "tahini", "molasses", "cornstarch", "yeast", "baking soda", "baking powder",
            "coriander", "cumin", "parsley", "pesto", "tzatziki",
        ],
    ),
    (
        "Grains & Pasta",
        &[
            "cereal", "cornflakes", "bran flakes", "pasta", "spaghetti", "penne", "linguine",
            "fettuccine", "macaroni", "lasagna", "ravioli", "tortellini", "angel hair pasta",
            "ziti", "rice", "white rice", "brown rice", "basmati rice", "jasmine rice",
            "wild rice", "noodle", "egg noodle", "ramen", "udon", "soba", "grain", "quinoa",
            "couscous", "oats", "steel-cut oats", "rolled oats", "instant oatmeal", "porridge",
            "muesli", "granola", "wheat", "bulgur wheat", "barley", "cornmeal", "polenta",
            "semolina", "flour", "buckwheat flour", "meal", "bran", "millet", "amaranth",
            "teff", "sorghum",
        ],
    ),
    (
        "Snacks & Confectionery",
        &[
            "chips", "potato chips", "tortilla chips", "crisps", "crackers",
            "whole grain crackers", "cheese crackers", "cookies", "chocolate chip cookies",
            "oatmeal cookies", "biscuit", "digestive biscuits", "shortbread", "wafer",
            "popcorn", "buttered popcorn", "caramel popcorn", "nuts", "almonds", "cashews",
            "walnuts", "peanuts", "pistachios", "chocolate", "milk chocolate", "dark chocolate",
            "white chocolate", "candy", "hard candy", "chewy candy", "lollies", "sweets", "gum",
            "mints", "bar", "granola bar", "energy bar", "snack", "pretzel", "soft pretzel",
            "nachos", "dip", "guacamole", "salsa", "hummus", "trail mix", "granola",
            "fruit snacks", "marshmallows", "toffee", "fudge", "licorice", "biersticks",
        ],
    ),
    (
        "Fruits & Vegetables",
        &[
            "apple", "banana", "orange", "lemon", "lime", "grape", "berry", "berries",
            "strawberry", "blueberry", "raspberry", "blackberry", "cranberry", "gooseberry",
            "boysenberry", "huckleberry", "melon", "watermelon", "cantaloupe", "honeydew",
            "pineapple", "mango", "peach", "plum", "pear", "apricot", "nectarine", "fig",
            "date", "raisin", "currant", "sultana", "pomegranate", "kiwi", "papaya", "guava",
            "passionfruit", "dragonfruit", "lychee", "longan", "persimmon", "starfruit",
            "jackfruit", "durian", "coconut", "avocado", "tomato", "potato", "potatoes",
            "sweet potato", "carrot", "onion", "garlic", "shallot", "leek", "lettuce",
            "cabbage", "broccoli", "cauliflower", "brussels sprout", "pepper", "bell pepper",
            "chili pepper", "cucumber", "zucchini", "courgette", "celery", "asparagus",
            "mushroom", "corn", "sweetcorn", "pea", "bean", "green bean", "snow pea",
            "sugar snap pea", "edamame", "chickpea", "lentil", "sprout", "spinach", "kale",
            "collard greens", "mustard greens", "turnip", "beet", "radish", "rutabaga",
            "parsnip", "swede", "yam", "eggplant", "artichoke", "fennel", "okra",
            "bamboo shoot", "watercress", "seaweed", "arugula", "chard", "bok choy", "daikon",
            "jicama", "horseradish", "pumpkin", "squash", "acorn squash", "butternut squash",
            "spaghetti squash", "gourd", "taro", "cassava", "mandarins", "slaw", "rocket",
            "pitahaya", "dragonfruit", "paw paw", "lettuce", "salad", "coleslaw",
            "cabbage slaw", "kumara", "cos mix",
        ],
    ),
    (
        "Meat & Seafood",
        &[
            "meat", "red meat", "beef", "ground beef", "steak", "ribeye steak", "sirloin steak",
            "pork", "pork chops", "pork loin", "lamb", "lamb chops", "leg of lamb", "chicken",
            "chicken breast", "chicken thighs", "chicken wings", "whole chicken", "turkey",
            "ground turkey", "turkey breast", "duck", "duck breast", "bacon", "pork bacon",
            "turkey bacon", "ham", "cooked ham", "honey-glazed ham", "sausage", "beef sausage",
            "pork sausage", "turkey sausage", "salami", "pepperoni", "mince", "ground meat",
            "veal", "game meat", "venison", "rabbit", "steak", "chop", "lamb chop", "pork chop",
            "roast", "beef roast", "pork roast", "fillet", "fish", "white fish", "salmon",
            "smoked salmon", "tuna", "canned tuna", "fresh tuna", "cod", "haddock", "tilapia",
            "snapper", "mackerel", "prawns", "shrimp", "jumbo shrimp", "shellfish", "mussels",
            "oysters", "clams", "scallops", "crab", "king crab", "crab legs", "lobster",
            "lobster tail", "seafood", "calamari", "octopus", "anchovies", "sardines",
            "fish fingers", "fish fillet", "crayfish", "roe", "frankfurters", "chorizo",
            "saveloys", "franks", "rissoles", "tenderloins", "pastrami", "sizzlers",
        ],
    ),
    (
        "Frozen Foods",
        &[
            "ice cream", "vanilla ice cream", "chocolate ice cream", "strawberry ice cream",
            "gelato", "sorbet", "lemon sorbet", "mango sorbet", "frozen yogurt", "froyo",
            "frozen pizza", "pepperoni pizza", "vegetarian pizza", "frozen meal",
            "frozen dinner", "TV dinner", "microwave meal", "frozen dessert", "popsicle",
            "ice pop", "frozen fruit", "frozen berries", "frozen peas", "frozen corn",
            "frozen vegetables", "ice", "crushed ice", "ice cubes", "frozen waffles",
            "frozen pancakes", "frozen pastries", "frozen pie", "pot pies", "frozen dumplings",
            "frozen spring rolls", "frozen seafood", "frozen shrimp", "frozen fish fillets",
            "frozen chicken nuggets", "frozen fries", "frozen chips", "frozen bread dough",
        ],
    ),
    (
        "Canned & Packaged Foods",
        &[
            "soup", "chicken soup", "tomato soup", "vegetable soup", "beans", "baked beans",
            "kidney beans", "black beans", "chickpeas", "lentils", "tomatoes", "diced tomatoes",
            "crushed tomatoes", "tomato paste", "corn", "sweet corn", "cream-style corn",
            "peas", "green peas", "fruit", "canned fruit", "peaches", "pineapple",
            "fruit cocktail", "tuna", "canned tuna", "salmon", "canned salmon", "sardines",
            "canned sardines", "anchovies", "meal", "ready-to-eat meal", "instant noodles",
            "macaroni and cheese", "dinner", "pasta", "instant pasta", "sauce", "tomato sauce",
            "alfredo sauce", "vegetables", "mixed vegetables", "spinach", "artichokes",
            "olives", "mix", "pancake mix", "muffin mix", "cake mix", "cornbread mix",
            "stuffing mix", "noodles", "rice", "canned gravy", "broth", "chicken broth",
            "beef broth",
        ],
    ),
    (
        "Baby & Infant",
        &[
            "formula", "infant formula", "toddler formula", "food", "baby food",
            "stage 1 baby food", "stage 2 baby food", "puree", "fruit puree", "vegetable puree",
            "snack", "baby snack", "teething biscuits", "puffs", "cereal", "baby cereal",
            "rice cereal", "oatmeal cereal", "juice", "baby juice", "apple juice", "pear juice",
            "baby milk", "milk powder", "toddler milk", "baby yogurt", "baby pudding",
        ],
    ),
    (
        "Pet Food",
        &[
            "food", "dog food", "cat food", "puppy food", "kitten food", "wet food",
            "canned food", "dry food", "treats", "dog treats", "cat treats", "kibble",
            "dry kibble", "biscuits", "dog biscuits", "cat biscuits", "feed", "bird feed",
            "fish food", "rabbit feed", "hamster feed", "pellets", "grain-free food",
            "high-protein food", "senior pet food", "special diet food",
        ],
    ),
    (
        "Health & Wellness",
        &[
            "supplement", "dietary supplement", "multivitamin", "vitamin", "vitamin C",
            "vitamin D", "vitamin B12", "protein", "protein powder", "whey protein",
            "plant-based protein", "collagen", "amino acids", "powder", "greens powder",
            "superfood powder", "bar", "protein bar", "energy bar", "meal replacement bar",
            "shake", "protein shake", "meal replacement shake", "smoothie mix", "tablet",
            "chewable tablet", "capsule", "softgel", "gummy", "omega-3 gummies",
            "fiber gummies", "oil", "fish oil", "flaxseed oil", "CBD oil", "essential oil",
            "immune booster", "detox supplement", "herbal supplement",
        ],
    ),
    (
        "Cleaning & Household",
        &[
            "cleaner", "all-purpose cleaner", "glass cleaner", "bathroom cleaner",
            "floor cleaner", "detergent", "laundry detergent", "dish detergent", "soap",
            "dish soap", "hand soap", "bar soap", "powder", "laundry powder", "cleaning powder",
            "liquid", "cleaning liquid", "detergent liquid", "spray", "disinfectant spray",
            "air freshener spray", "wipes", "disinfectant wipes", "baby wipes", "surface wipes",
            "bleach", "toilet bleach", "household bleach", "freshener", "air freshener",
            "odor eliminator", "paper", "paper towel", "toilet paper", "tissue paper", "towel",
            "kitchen towel", "bath towel", "tissue", "facial tissue", "wrap", "cling wrap",
            "plastic wrap", "bag", "garbage bag", "reusable bag", "foil", "aluminum foil",
            "filter", "water filter", "air filter", "vacuum bag", "dryer sheet",
        ],
    ),
    (
        "Personal Care",
        &[
            "shampoo", "anti-dandruff shampoo", "volumizing shampoo", "conditioner",
            "deep conditioner", "leave-in conditioner", "soap", "bar soap", "liquid soap",
            "wash", "body wash", "face wash", "lotion", "body lotion", "hand lotion",
            "moisturizing cream", "anti-aging cream", "deodorant", "stick deodorant",
            "spray deodorant", "toothpaste", "whitening toothpaste", "sensitive toothpaste",
            "mouthwash", "antibacterial mouthwash", "floss", "dental floss", "floss picks",
            "brush", "toothbrush", "hairbrush", "razor", "disposable razor", "electric razor",
            "tissue", "facial tissue", "wipes", "makeup wipes", "baby wipes", "sanitizer",
            "hand sanitizer", "spray sanitizer", "sunscreen", "SPF moisturizer", "sunblock",
            "lip balm", "nail clippers", "cotton swabs",
        ],
    ),
    (
        "Miscellaneous",
        &[
            "set", "gift set", "starter set", "pack", "multi-pack", "value pack", "kit",
            "starter kit", "travel kit", "bundle", "product bundle", "collection",
            "gift collection", "variety", "variety pack", "selection", "curated selection",
            "assortment", "mixed assortment", "mix", "trail mix", "combo", "combo pack",
            "package", "care package", "gift package", "gift", "gift card", "gift basket",
            "subscription box",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_all_grocery_categories() {
        let tax = Taxonomy::builtin();
        assert_eq!(tax.categories().len(), 16);
        assert_eq!(tax.categories()[0].name, "Dairy & Eggs");
        assert_eq!(tax.categories()[15].name, "Miscellaneous");
        assert!(tax.category("pet food").is_some());
    }

    #[test]
    fn unique_keywords_are_normalized_and_deduplicated() {
        let tax = Taxonomy::from_pairs(&[
            ("A", &["Greek Yogurt", "steak", "steak"]),
            ("B", &["mix", "STEAK"]),
        ])
        .unwrap();
        assert_eq!(tax.unique_keywords(), vec!["greek yogurt", "steak", "mix"]);
    }

    #[test]
    fn parses_toml_taxonomy() {
        let tax = Taxonomy::from_toml_str(
            r#"
            [[categories]]
            name = "Tools"
            keywords = ["hammer", "saw"]

            [[categories]]
            name = "Garden"
            keywords = ["hose"]
            "#,
        )
        .unwrap();
        assert_eq!(tax.categories().len(), 2);
        assert_eq!(tax.categories()[1].keywords, vec!["hose"]);
    }

    #[test]
    fn rejects_empty_taxonomy_and_empty_category() {
        assert!(Taxonomy::new(vec![]).is_err());
        let err = Taxonomy::from_pairs(&[("Empty", &["  "])]).unwrap_err();
        assert!(err.to_string().contains("Empty"));
    }
}
