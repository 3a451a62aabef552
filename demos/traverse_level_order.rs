use avl_insert::AvlTree;

fn main() {
    let mut tree = AvlTree::new();
    tree.insert(1);
    tree.insert(2);
    tree.insert(3);
    tree.insert(4);
    tree.insert(5);
    tree.insert(6);

    println!("Level-order traversal:");
    tree.traverse_level_order(|node| {
        println!("Value: {}, Height: {}", node.value(), node.height());
    });
}
