//! Provider and food classifications.

text_enum! {
    /// Kind of organization donating food.
    ProviderType {
        Restaurant => "Restaurant",
        GroceryStore => "Grocery Store",
        Supermarket => "Supermarket",
        Individual => "Individual",
    }
}

text_enum! {
    /// Dietary category of a listing.
    FoodType {
        Vegetarian => "Vegetarian",
        NonVegetarian => "Non-Vegetarian",
        Vegan => "Vegan",
    }
}

text_enum! {
    MealType {
        Breakfast => "Breakfast",
        Lunch => "Lunch",
        Dinner => "Dinner",
        Snacks => "Snacks",
    }
}
