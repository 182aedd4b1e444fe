//! Built-in name table for the local game.
//!
//! Entries are `(offset, name)` pairs, where the network id is
//! [`BASE_ID`](crate::registry::BASE_ID) plus the offset. Both tables are
//! sorted by offset so lookups can binary search.

pub(crate) const ITEMS: &[(i64, &str)] = &[
    // Area access
    (100, "Garden Access"),
    (101, "High Street Access"),
    (102, "Back Gardens Access"),
    (103, "Pub Access"),
    (104, "Model Village Access"),
    (110, "Progressive Area"),
    // NPC souls
    (120, "Groundskeeper's Soul"),
    (121, "Boy's Soul"),
    (122, "TV Shop Owner's Soul"),
    (123, "Market Lady's Soul"),
    (124, "Tidy Neighbour's Soul"),
    (125, "Messy Neighbour's Soul"),
    (126, "Burly Man's Soul"),
    (127, "Old Man's Soul"),
    (128, "Pub Lady's Soul"),
    (129, "Fancy Ladies' Souls"),
    (130, "Cook's Soul"),
    // Filler
    (200, "Mega Honk"),
    (201, "Speedy Feet"),
    (202, "Silent Steps"),
    (203, "A Goose Day"),
    (204, "Coin"),
    // Traps
    (300, "Tired Goose"),
    (301, "Confused Feet"),
    (302, "Butterbeak"),
    (303, "Suspicious Goose"),
    // Prop souls
    (400, "Carrots"),
    (401, "Tomatoes"),
    (402, "Pumpkins"),
    (403, "Topsoil Bags"),
    (404, "Quoits"),
    (405, "Plates"),
    (406, "Oranges"),
    (407, "Leeks"),
    (408, "Cucumbers"),
    (410, "Umbrellas"),
    (411, "Tinned Food"),
    (412, "Socks"),
    (413, "Pint Bottles"),
    (414, "Knives"),
    (415, "Gumboots"),
    (416, "Forks"),
    (418, "Apple Cores"),
    (419, "Apples"),
    (420, "Sandwich"),
    (422, "Ribbons"),
    (423, "Walkie Talkies"),
    (424, "Boots"),
    (425, "Miniature People"),
    (500, "Radio"),
    (501, "Trowel"),
    (503, "Tulip"),
    (504, "Jam"),
    (505, "Picnic Mug"),
    (506, "Thermos"),
    (507, "Straw Hat"),
    (508, "Drink Can"),
    (509, "Tennis Ball"),
    (511, "Rake"),
    (512, "Picnic Basket"),
    (513, "Esky"),
    (514, "Shovel"),
    (515, "Watering Can"),
    (517, "Mallet"),
    (518, "Wooden Crate"),
    (521, "Horn-Rimmed Glasses"),
    (522, "Red Glasses"),
    (523, "Sunglasses"),
    (524, "Loo Paper"),
    (525, "Toy Car"),
    (526, "Hairbrush"),
    (527, "Toothbrush"),
    (528, "Stereoscope"),
    (529, "Dish Soap Bottle"),
    (530, "Spray Bottle"),
    (531, "Weed Tools"),
    (532, "Lily Flower"),
    (533, "Toy Plane"),
    (535, "Chalk"),
    (536, "Dustbin Lid"),
    (537, "Shopping Basket"),
    (538, "Push Broom"),
    (540, "Dustbin"),
    (541, "Baby Doll"),
    (542, "Pricing Gun"),
    (543, "Adding Machine"),
    (550, "Dummy"),
    (551, "Cricket Ball"),
    (552, "Bust Pipe"),
    (553, "Bust Hat"),
    (554, "Bust Glasses"),
    (555, "Tea Cup"),
    (556, "Newspaper"),
    (557, "Badminton Racket"),
    (558, "Pot Stack"),
    (559, "Soap"),
    (560, "Paintbrush"),
    (561, "Vase"),
    (562, "Bra"),
    (563, "Rose"),
    (565, "Cricket Bat"),
    (566, "Tea Pot"),
    (567, "Clippers"),
    (568, "Duck Statue"),
    (569, "Frog Statue"),
    (570, "Jeremy Fish"),
    (571, "No Goose Sign (Messy)"),
    (572, "Drawer"),
    (573, "Enamel Jug"),
    (574, "No Goose Sign (Clean)"),
    (580, "Fishing Bobber"),
    (581, "Letter"),
    (582, "Pint Glasses"),
    (583, "Toy Boat"),
    (585, "Pepper Grinder"),
    (587, "Cork"),
    (588, "Candlestick"),
    (589, "Flower for Vase"),
    (590, "Harmonica"),
    (591, "Tackle Box"),
    (592, "Traffic Cone"),
    (593, "Parcel"),
    (594, "Stealth Box"),
    (595, "No Goose Sign (Pub)"),
    (596, "Portable Stool"),
    (597, "Dartboard"),
    (598, "Mop Bucket"),
    (599, "Mop"),
    (601, "Bucket"),
    (610, "Miniature Mail Pillar"),
    (611, "Miniature Phone Door"),
    (612, "Miniature Shovel"),
    (613, "Poppy Flower"),
    (614, "Timber Handle"),
    (615, "Miniature Birdbath"),
    (616, "Miniature Easel"),
    (617, "Miniature Benches"),
    (618, "Miniature Pump"),
    (619, "Miniature Goose"),
    (620, "Miniature Sun Lounge"),
    (621, "Golden Bell"),
    // Victory
    (999, "Escape Sequence"),
];

pub(crate) const LOCATIONS: &[(i64, &str)] = &[
    // Goals
    (1, "Get into the garden"),
    (2, "Get the groundskeeper wet"),
    (3, "Steal the groundskeeper's keys"),
    (4, "Make the groundskeeper wear his sun hat"),
    (5, "Rake in the lake"),
    (6, "Have a picnic"),
    (7, "Make the groundskeeper hammer his thumb"),
    (10, "Break the broom"),
    (11, "Trap the boy in the phone booth"),
    (12, "Make the boy wear the wrong glasses"),
    (13, "Make someone buy back their own stuff"),
    (14, "Get on TV"),
    (15, "Go shopping"),
    (16, "Trap the shopkeeper in the garage"),
    (20, "Make someone break the fancy vase"),
    (21, "Help the woman dress up the bust"),
    (22, "Make the man spit out his tea"),
    (23, "Get dressed up with a ribbon"),
    (24, "Make the man go barefoot"),
    (25, "Do the washing"),
    (26, "Make someone prune the prize rose"),
    (30, "Get into the pub"),
    (31, "Break the dartboard"),
    (32, "Get the toy boat"),
    (33, "Make the old man fall on his bum"),
    (34, "Be awarded a flower"),
    (35, "Steal a pint glass and drop it in the canal"),
    (36, "Set the table"),
    (37, "Drop a bucket on the burly man's head"),
    (40, "Get into the model village"),
    (41, "Steal the beautiful miniature golden bell"),
    (42, "...and take it all the way back home"),
    (50, "Lock the groundskeeper out of the garden"),
    (51, "Cabbage picnic"),
    (52, "Trip the boy in the puddle"),
    (53, "Make the scales go ding"),
    (54, "Open an umbrella inside the TV shop"),
    (55, "Make someone from outside the high street buy back their own stuff"),
    (56, "Collect the five flowers"),
    (60, "Trap the boy in the garage"),
    (61, "Catch an object as it's thrown over the fence"),
    (62, "Get thrown over the fence"),
    (63, "Dress up the bust with things from outside the back gardens"),
    (64, "Score a goal"),
    (65, "Sail the toy boat under the bridge"),
    (66, "Perform at the pub wearing a ribbon"),
    (67, "Steal the old man's woolen hat"),
    (70, "Complete Garden before noon"),
    (71, "Complete High Street before noon"),
    (72, "Complete Back Gardens before noon"),
    (73, "Complete Pub before noon"),
    (80, "100% Completion"),
    (81, "All Garden tasks complete"),
    (82, "All High Street tasks complete"),
    (83, "All Back Gardens tasks complete"),
    (84, "All Pub tasks complete"),
    (85, "All 'To Do (As Well)' tasks complete"),
    (86, "All speedrun tasks complete"),
    (87, "All speedrun tasks complete (Golden Bell)"),
    (88, "All main task lists complete"),
    (89, "All main task lists complete (Golden Bell)"),
    (90, "All tasks complete"),
    (91, "All tasks complete (Golden Bell)"),
    (92, "All main task lists + 'To Do (As Well)' complete (Golden Bell)"),
    (93, "Get into the Model Village (Golden Bell)"),
    (94, "Complete the four final area tasks (Golden Bell)"),
    // Pickups
    (1002, "Pickup Radio"),
    (1003, "Pickup Trowel"),
    (1004, "Pickup Keys"),
    (1006, "Pickup Tulip"),
    (1007, "Pickup Apple 1"),
    (1008, "Pickup Jam"),
    (1009, "Pickup Picnic Mug"),
    (1010, "Pickup Thermos"),
    (1011, "Pickup Sandwich (Right)"),
    (1012, "Pickup Sandwich (Left)"),
    (1014, "Pickup Straw Hat"),
    (1015, "Pickup Drink Can"),
    (1016, "Pickup Tennis Ball"),
    (1017, "Pickup Groundskeeper's Hat"),
    (1018, "Pickup Apple 2"),
    (1021, "Pickup Boy's Glasses"),
    (1022, "Pickup Horn-Rimmed Glasses"),
    (1023, "Pickup Red Glasses"),
    (1024, "Pickup Sunglasses"),
    (1025, "Pickup Loo Paper"),
    (1026, "Pickup Toy Car"),
    (1027, "Pickup Hairbrush"),
    (1028, "Pickup Toothbrush"),
    (1029, "Pickup Stereoscope"),
    (1030, "Pickup Dish Soap Bottle"),
    (1031, "Pickup Tinned Food (Blue)"),
    (1032, "Pickup Tinned Food (Yellow)"),
    (1033, "Pickup Tinned Food (Orange)"),
    (1034, "Pickup Weed Tool"),
    (1035, "Pickup Lily Flower"),
    (1036, "Pickup Orange 1"),
    (1037, "Pickup Shop Tomato 1"),
    (1038, "Pickup Shop Carrot 1"),
    (1039, "Pickup Cucumber 1"),
    (1040, "Pickup Leek 1"),
    (1041, "Pickup Toy Plane"),
    (1042, "Pickup Pint Bottle (Hub)"),
    (1043, "Pickup Spray Bottle"),
    (1044, "Pickup Walkie Talkie 2"),
    (1045, "Pickup Walkie Talkie 1"),
    (1046, "Pickup Apple Core 1"),
    (1047, "Pickup Dustbin Lid"),
    (1048, "Pickup Pint Bottle (High Street 1)"),
    (1049, "Pickup Pint Bottle (High Street 2)"),
    (1050, "Pickup Chalk"),
    (1051, "Pickup Shop Tomato 2"),
    (1052, "Pickup Orange 2"),
    (1053, "Pickup Orange 3"),
    (1054, "Pickup Shop Carrot 2"),
    (1055, "Pickup Cucumber 2"),
    (1056, "Pickup Leek 2"),
    (1057, "Pickup Shop Carrot 3"),
    (1058, "Pickup Apple Core 2"),
    (1059, "Pickup Leek 3"),
    (1060, "Pickup Shop Tomato 3"),
    (1061, "Pickup Cucumber 3"),
    (1062, "Pickup Garden Fork"),
    (1071, "Pickup Ribbon (Blue)"),
    (1072, "Pickup Dummy"),
    (1073, "Pickup Cricket Ball"),
    (1074, "Pickup Bust Pipe"),
    (1075, "Pickup Bust Hat"),
    (1076, "Pickup Bust Glasses"),
    (1077, "Pickup Slipper (Right)"),
    (1078, "Pickup Slipper (Left)"),
    (1079, "Pickup Tea Cup"),
    (1080, "Pickup Newspaper"),
    (1081, "Pickup Sock 1"),
    (1082, "Pickup Sock 2"),
    (1083, "Pickup Vase"),
    (1084, "Pickup Ribbon (Red)"),
    (1085, "Pickup Pot Stack"),
    (1086, "Pickup Soap"),
    (1087, "Pickup Paintbrush"),
    (1088, "Pickup Vase Piece 1"),
    (1089, "Pickup Vase Piece 2"),
    (1090, "Pickup Bra"),
    (1093, "Pickup Badminton Racket"),
    (1094, "Pickup Rose"),
    (1101, "Pickup Fishing Bobber"),
    (1102, "Pickup Letter"),
    (1104, "Pickup Plate 1"),
    (1105, "Pickup Plate 2"),
    (1106, "Pickup Plate 3"),
    (1107, "Pickup Green Quoit 1"),
    (1108, "Pickup Red Quoit 1"),
    (1109, "Pickup Fork 1"),
    (1110, "Pickup Fork 2"),
    (1111, "Pickup Knife 1"),
    (1112, "Pickup Knife 2"),
    (1113, "Pickup Cork"),
    (1114, "Pickup Candlestick"),
    (1115, "Pickup Flower for Vase"),
    (1116, "Pickup Dart 1"),
    (1117, "Pickup Dart 2"),
    (1118, "Pickup Dart 3"),
    (1119, "Pickup Harmonica"),
    (1120, "Pickup Pint Glass"),
    (1121, "Pickup Toy Boat"),
    (1122, "Pickup Old Man's Woolen Hat"),
    (1123, "Pickup Pepper Grinder"),
    (1124, "Pickup Pub Woman's Cloth"),
    (1125, "Pickup Green Quoit 2"),
    (1126, "Pickup Green Quoit 3"),
    (1127, "Pickup Red Quoit 2"),
    (1128, "Pickup Red Quoit 3"),
    (1131, "Pickup Mini Person (Child)"),
    (1132, "Pickup Mini Person (Jumpsuit)"),
    (1133, "Pickup Mini Person (Gardener)"),
    (1134, "Pickup Mini Shovel"),
    (1135, "Pickup Poppy Flower"),
    (1136, "Pickup Mini Person (Old Woman)"),
    (1137, "Pickup Mini Phone Door"),
    (1138, "Pickup Mini Mail Pillar"),
    (1139, "Pickup Mini Person (Postie)"),
    (1140, "Pickup Mini Person (Vestman)"),
    (1141, "Pickup Mini Person"),
    (1142, "Pickup Timber Handle"),
    (1143, "Pickup Golden Bell"),
    (1144, "Pickup Mini Goose"),
    // Drags
    (1201, "Drag Rake"),
    (1202, "Drag Picnic Basket"),
    (1203, "Drag Esky"),
    (1205, "Drag Shovel"),
    (1206, "Drag Pumpkin 1"),
    (1207, "Drag Pumpkin 2"),
    (1208, "Drag Pumpkin 3"),
    (1209, "Drag Pumpkin 4"),
    (1210, "Drag Watering Can"),
    (1211, "Drag Gumboot 1"),
    (1212, "Drag Gumboot 2"),
    (1213, "No Goose Sign (Garden)"),
    (1214, "Drag Wooden Crate"),
    (1215, "Drag Fence Bolt"),
    (1216, "Drag Mallet"),
    (1220, "Drag Shopping Basket"),
    (1221, "Drag Umbrella (Black)"),
    (1222, "Drag Push Broom"),
    (1223, "Drag Broken Broom Head"),
    (1224, "Drag Dustbin"),
    (1225, "Drag Baby Doll"),
    (1226, "Drag Pricing Gun"),
    (1227, "Drag Adding Machine"),
    (1228, "Drag Umbrella (Rainbow)"),
    (1229, "Drag Umbrella (Red)"),
    (1240, "Drag Rose Box"),
    (1241, "Drag Cricket Bat"),
    (1242, "Drag Tea Pot"),
    (1243, "Drag Clippers"),
    (1244, "Drag Duck Statue"),
    (1245, "Drag Frog Statue"),
    (1246, "Drag Jeremy Fish"),
    (1247, "Drag No Goose Sign (Messy)"),
    (1248, "Drag Drawer"),
    (1249, "Drag Enamel Jug"),
    (1250, "Drag No Goose Sign (Clean)"),
    (1270, "Drag Tackle Box"),
    (1271, "Drag Traffic Cone"),
    (1272, "Drag Parcel"),
    (1273, "Drag Stealth Box"),
    (1274, "Drag No Goose Sign (Pub)"),
    (1275, "Drag Portable Stool"),
    (1276, "Drag Dartboard"),
    (1277, "Drag Mop Bucket"),
    (1278, "Drag Mop"),
    (1279, "Drag Delivery Box"),
    (1280, "Drag Bucket"),
    (1290, "Drag Mini Bench"),
    (1291, "Drag Mini Pump"),
    (1292, "Drag Mini Street Bench"),
    (1293, "Drag Mini Birdbath"),
    (1294, "Drag Mini Easel"),
    (1295, "Drag Mini Sun Lounge"),
    // Interactions
    (1301, "Ring Bell"),
    (1302, "Honk at Speaker"),
    (1303, "Doorbell"),
    (1304, "Garden Gate"),
    (1305, "Greenhouse Window"),
    (1306, "Intro Gate"),
    (1307, "TV Remote"),
    (1308, "Open Umbrella (Black)"),
    (1309, "Turn on Tap"),
    (1310, "Open Phone Booth"),
    (1311, "Spin Propeller"),
    (1312, "Kick Football"),
    (1313, "Open Umbrella (Black)"),
    (1314, "Open Umbrella (Rainbow)"),
    (1315, "Open Umbrella (Red)"),
    (1316, "Honk at Wimp"),
    (1317, "Honk at Burly Kid"),
    (1318, "Kick Football"),
    (1319, "Turn on Sprinkler"),
    (1320, "Untie Wimp's Left Laces"),
    (1321, "Untie Wimp's Right Laces"),
    (1322, "Untie Pub Man's Left Laces"),
    (1323, "Untie Pub Man's Right Laces"),
    (1324, "Spin Windmill"),
    (1325, "Wheel Barrow Handle"),
    (1326, "Spin Purple Flower"),
    (1327, "Spin Sunflower"),
    (1328, "Spin TV Dial"),
    (1329, "Ring Service Bell"),
    (1330, "Close Van Door (Left)"),
    (1331, "Close Van Door (Right)"),
    (1332, "Untie Burly Man's Left Laces"),
    (1333, "Untie Burly Man's Right Laces"),
    (1334, "Turn on Pub Tap"),
    (1340, "Wind Chime G"),
    (1341, "Wind Chime F"),
    (1342, "Wind Chime E"),
    (1343, "Wind Chime D"),
    (1344, "Wind Chime C"),
    (1345, "Wind Chime B"),
    (1346, "Wind Chime A"),
    (1350, "Peck Model Church Doorway 1"),
    (1351, "Peck Model Church Doorway 2"),
    (1352, "Peck Model Church Doorway 3"),
    (1353, "Peck Model Church Doorway 4"),
    (1354, "Peck Model Church Doorway 5"),
    (1355, "Peck Model Church Doorway 6"),
    (1356, "Peck Model Church Doorway 7"),
    (1357, "Peck Model Church Doorway 8"),
    (1358, "Peck Model Church Doorway 9"),
    (1359, "Peck Model Church Doorway 10"),
    (1360, "Peck Model Church Doorway 11"),
    (1361, "Peck Model Church Doorway 12"),
    (1362, "Peck Model Church Doorway 13"),
    (1363, "Peck Model Church Doorway 14"),
    (1364, "Peck Model Church Doorway 15"),
    (1365, "Peck Model Church Doorway 16"),
    (1366, "Peck Model Church Doorway 17"),
    (1367, "Peck Model Church Doorway 18"),
    (1368, "Peck Model Church Doorway 19"),
    (1369, "Peck Model Church Tower 1"),
    (1370, "Peck Model Church Tower 2"),
    (1371, "Peck Model Church Tower 3"),
    (1372, "Peck Model Church Tower 4"),
    (1373, "Peck Model Church Tower 5"),
    (1374, "Peck Model Church Tower 6"),
    (1375, "Peck Model Church Tower 7"),
    (1376, "Peck Model Church Tower 8"),
    (1377, "Peck Model Church Tower 9"),
    (1378, "Peck Model Church Tower 10"),
    (1379, "Peck Model Church Tower 11"),
    (1380, "Peck Model Church Tower 12"),
    (1381, "Peck Model Church Tower 13"),
    (1382, "Peck Model Church Tower 14"),
    (1383, "Peck Model Church Tower 15"),
    (1384, "Peck Model Church Tower 16"),
    (1390, "Peck Model Church Doorway"),
    (1391, "Peck Model Church Tower"),
    // Renamed pickups
    (1401, "Pickup Carrot 1"),
    (1402, "Pickup Carrot 2"),
    (1403, "Pickup Carrot 3"),
    (1404, "Pickup Carrot 4"),
    (1405, "Pickup Carrot 5"),
    (1406, "Pickup Carrot 6"),
    (1407, "Pickup Carrot 7"),
    (1408, "Pickup Carrot 8"),
    (1409, "Pickup Carrot 9"),
    (1410, "Pickup Carrot 10"),
    (1411, "Pickup Carrot 11"),
    (1412, "Pickup Carrot 12"),
    (1413, "Pickup Carrot 13"),
    (1421, "Pickup Boxed Pub Tomato 1"),
    (1422, "Pickup Boxed Pub Tomato 2"),
    (1423, "Pickup Boxed Pub Tomato 3"),
    (1424, "Pickup Boxed Pub Tomato 4"),
    (1425, "Pickup Boxed Pub Tomato 5"),
    (1426, "Pickup Boxed Pub Tomato 6"),
    (1427, "Pickup Boxed Pub Tomato 7"),
    (1428, "Pickup Boxed Pub Tomato 8"),
    (1429, "Pickup Boxed Pub Tomato 9"),
    (1430, "Pickup Pub Tomato 1"),
    (1431, "Pickup Pub Tomato 2"),
    (1440, "Pickup Boot (Hub)"),
    (1441, "Pickup Boot (Start)"),
    (1450, "Pickup Topsoil Bag 1"),
    (1451, "Pickup Topsoil Bag 2"),
    (1452, "Pickup Topsoil Bag 3"),
    // Hub extras
    (1500, "Well Drop"),
];
